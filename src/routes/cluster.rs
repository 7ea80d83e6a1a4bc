//! `POST /cluster`

use axum::{body::Bytes, extract::State, Json};

use crate::core::ClusterResult;
use crate::error::ApiError;
use crate::processing;
use crate::routes::AppState;

/// Cluster a batch of embeddings.
///
/// The body is parsed by hand rather than through the `Json` extractor so malformed
/// input takes the same `500 {"error"}` path as every other failure. The pipeline is
/// CPU-bound and runs on the blocking pool.
pub async fn cluster_handler(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<ClusterResult>, ApiError> {
	let params = state.params.clone();
	let result =
		tokio::task::spawn_blocking(move || processing::process_body(&body, &params)).await??;
	Ok(Json(result))
}
