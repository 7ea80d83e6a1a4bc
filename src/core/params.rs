//! Tunable pipeline parameters

use crate::config;

/// UMAP settings for the dimensionality reduction stage
#[derive(Debug, Clone)]
pub struct ReductionParams {
	pub n_neighbors: usize,
	pub n_components: usize,
	pub min_dist: f32,
	/// Seeds the spectral initial layout; unseeded runs are not reproducible
	pub seed: Option<u64>,
}

impl Default for ReductionParams {
	fn default() -> Self {
		Self {
			n_neighbors: config::UMAP_NEIGHBORS,
			n_components: config::UMAP_COMPONENTS,
			min_dist: config::UMAP_MIN_DIST,
			seed: None,
		}
	}
}

/// HDBSCAN settings for the clustering stage (Euclidean metric)
#[derive(Debug, Clone)]
pub struct ClusterParams {
	pub min_cluster_size: usize,
	pub min_samples: usize,
	pub epsilon: f64,
}

impl Default for ClusterParams {
	fn default() -> Self {
		Self {
			min_cluster_size: config::MIN_CLUSTER_SIZE,
			min_samples: config::MIN_SAMPLES,
			epsilon: config::CLUSTER_EPSILON,
		}
	}
}

#[derive(Debug, Clone)]
pub struct PipelineParams {
	/// Remove near-duplicates before clustering
	pub dedup: bool,
	pub duplicate_threshold: f32,
	pub reduction: ReductionParams,
	pub cluster: ClusterParams,
}

impl Default for PipelineParams {
	fn default() -> Self {
		Self {
			dedup: true,
			duplicate_threshold: config::DUPLICATE_THRESHOLD,
			reduction: ReductionParams::default(),
			cluster: ClusterParams::default(),
		}
	}
}
