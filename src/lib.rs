//! # embed-cluster
//!
//! HTTP microservice that groups uploaded files by embedding similarity.
//! Removes near-duplicates, reduces with UMAP and clusters with HDBSCAN.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod processing;
pub mod routes;
pub mod ui;
