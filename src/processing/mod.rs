//! Clustering pipeline stages

pub mod cluster;
pub mod dedup;
pub mod format;
pub mod pipeline;
pub mod umap;

pub use pipeline::{process_body, run};
