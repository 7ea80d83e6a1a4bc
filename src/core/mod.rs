//! Core domain types

pub mod batch;
pub mod cluster;
pub mod embedding;
pub mod params;

pub use batch::{ClusterRequest, EmbeddingBatch, EmbeddingItem};
pub use cluster::{ClusterResult, FileCluster, NOISE_LABEL};
pub use embedding::Embedding;
pub use params::{ClusterParams, PipelineParams, ReductionParams};
