//! # HTTP Routes
//!
//! Router construction and shared handler state.

pub mod cluster;
pub mod health;

use std::sync::Arc;

use axum::{
	routing::{get, post},
	Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::core::PipelineParams;

/// Read-only state shared by all handlers
#[derive(Clone)]
pub struct AppState {
	pub params: Arc<PipelineParams>,
}

impl AppState {
	pub fn new(params: PipelineParams) -> Self {
		Self {
			params: Arc::new(params),
		}
	}
}

/// Build the service router; cross-origin requests are allowed from anywhere
pub fn create_router(state: AppState) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods(Any)
		.allow_headers(Any);

	Router::new()
		.route("/health", get(health::health_check))
		.route("/cluster", post(cluster::cluster_handler))
		.layer(cors)
		.with_state(state)
}
