//! Map cluster labels back to file identifiers

use anyhow::Result;

use crate::core::{ClusterResult, FileCluster, NOISE_LABEL};

/// Build the response payload from parallel labels and file ids.
///
/// Outliers (label -1) are listed separately and left out of the mapping.
pub fn format_results(
	labels: &[i32],
	file_ids: &[String],
	duplicates: Option<Vec<String>>,
) -> Result<ClusterResult> {
	if labels.len() != file_ids.len() {
		anyhow::bail!(
			"Got {} cluster labels for {} files",
			labels.len(),
			file_ids.len()
		);
	}

	let mut file_cluster_mapping = Vec::new();
	let mut outliers = Vec::new();

	for (&label, file_id) in labels.iter().zip(file_ids) {
		if label == NOISE_LABEL {
			outliers.push(file_id.clone());
		} else {
			file_cluster_mapping.push(FileCluster {
				file_id: file_id.clone(),
				cluster: label,
			});
		}
	}

	Ok(ClusterResult {
		file_cluster_mapping,
		outliers,
		duplicates,
	})
}
