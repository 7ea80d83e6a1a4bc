//! Request pipeline: parse → deduplicate → reduce → cluster → format

use std::time::Instant;

use anyhow::Result;

use crate::core::{ClusterRequest, ClusterResult, EmbeddingBatch, PipelineParams, NOISE_LABEL};
use crate::processing::{cluster, dedup, format, umap};
use crate::ui;

/// Parse a raw `POST /cluster` body and run the pipeline on it
pub fn process_body(body: &[u8], params: &PipelineParams) -> Result<ClusterResult> {
	let request = ClusterRequest::from_slice(body)?;
	ui::info(&format!(
		"Received clustering request with {} embeddings",
		request.embeddings.len()
	));
	let batch = EmbeddingBatch::from_request(request)?;
	run(batch, params)
}

/// Run the clustering pipeline on a validated batch
pub fn run(batch: EmbeddingBatch, params: &PipelineParams) -> Result<ClusterResult> {
	let start = Instant::now();
	ui::debug(&format!(
		"Batch: {} embeddings of {}D",
		batch.len(),
		batch.dim()
	));

	let (survivors, duplicates) = if params.dedup {
		let deduped = dedup::remove_duplicates(batch, params.duplicate_threshold);
		(deduped.batch, Some(deduped.duplicates))
	} else {
		(batch, None)
	};

	let labels = if survivors.len() < params.cluster.min_cluster_size {
		ui::debug(&format!(
			"{} embeddings left, fewer than min_cluster_size {}; skipping reduction",
			survivors.len(),
			params.cluster.min_cluster_size
		));
		vec![NOISE_LABEL; survivors.len()]
	} else {
		let reduced = umap::reduce_embeddings(&survivors.embeddings, &params.reduction)?;
		cluster::cluster_points(&reduced, &params.cluster)?
	};

	let result = format::format_results(&labels, &survivors.file_ids, duplicates)?;

	ui::success(&format!(
		"Clustering complete: found {} clusters, {} outliers in {:.2}s",
		result.cluster_count(),
		result.outliers.len(),
		start.elapsed().as_secs_f32()
	));

	Ok(result)
}
