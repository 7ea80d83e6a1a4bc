//! HDBSCAN clustering of reduced embeddings

use std::collections::HashMap;

use anyhow::{Context, Result};
use hdbscan::{DistanceMetric, Hdbscan, HdbscanHyperParams};

use crate::core::{ClusterParams, NOISE_LABEL};
use crate::ui;

/// Cluster points with HDBSCAN (Euclidean). Returns one label per point, -1 for noise.
///
/// Cluster ids are reassigned by size, largest first.
pub fn cluster_points(points: &[Vec<f32>], params: &ClusterParams) -> Result<Vec<i32>> {
	ui::debug(&format!(
		"HDBSCAN min_cluster_size: {}, min_samples: {}, epsilon: {}",
		params.min_cluster_size, params.min_samples, params.epsilon
	));

	let hyper_params = HdbscanHyperParams::builder()
		.min_cluster_size(params.min_cluster_size)
		.min_samples(params.min_samples)
		.epsilon(params.epsilon)
		.dist_metric(DistanceMetric::Euclidean)
		.build();

	let clusterer = Hdbscan::new(points, hyper_params);
	let labels = clusterer.cluster().context("HDBSCAN clustering failed")?;

	Ok(relabel_by_size(&labels))
}

/// Renumber clusters so the largest is 0; ties keep first-appearance order
fn relabel_by_size(labels: &[i32]) -> Vec<i32> {
	let mut sizes: HashMap<i32, (usize, usize)> = HashMap::new();
	for (idx, &label) in labels.iter().enumerate() {
		if label != NOISE_LABEL {
			sizes.entry(label).or_insert((0, idx)).0 += 1;
		}
	}

	let mut order: Vec<(i32, usize, usize)> = sizes
		.into_iter()
		.map(|(label, (size, first))| (label, size, first))
		.collect();
	order.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

	let remap: HashMap<i32, i32> = order
		.iter()
		.enumerate()
		.map(|(new_id, &(label, _, _))| (label, new_id as i32))
		.collect();

	labels
		.iter()
		.map(|label| remap.get(label).copied().unwrap_or(NOISE_LABEL))
		.collect()
}
