//! # User Interface
//!
//! Colored, timestamped console logging.

pub mod log;

pub use log::{debug, error, info, print_logo, success, warn, Log};
