//! Clustering result payload

use serde::Serialize;

/// Label HDBSCAN assigns to points outside every dense region
pub const NOISE_LABEL: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCluster {
	pub file_id: String,
	pub cluster: i32,
}

/// Response of `POST /cluster`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
	/// Clustered files; outliers are excluded
	pub file_cluster_mapping: Vec<FileCluster>,
	pub outliers: Vec<String>,
	/// Only present when deduplication ran
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duplicates: Option<Vec<String>>,
}

impl ClusterResult {
	/// Number of distinct clusters found
	pub fn cluster_count(&self) -> usize {
		let mut ids: Vec<i32> = self.file_cluster_mapping.iter().map(|m| m.cluster).collect();
		ids.sort_unstable();
		ids.dedup();
		ids.len()
	}
}
