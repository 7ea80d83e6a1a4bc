//! embed-cluster - embedding clustering service
//!
//! Serves `POST /cluster` for the upload pipeline.

use anyhow::{Context, Result};
use clap::Parser;

use embed_cluster::cli::Cli;
use embed_cluster::routes::{create_router, AppState};
use embed_cluster::ui::{self, Log};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	Log::set_verbose(cli.verbose);

	ui::print_logo();

	let params = cli.pipeline_params();
	ui::debug(&format!("Pipeline parameters: {:?}", params));
	if !params.dedup {
		ui::info("Duplicate removal disabled");
	}

	let app = create_router(AppState::new(params));

	let addr = cli.addr();
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("Failed to bind {}", addr))?;
	ui::success(&format!("Listening on http://{}", addr));

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("Server error")?;

	ui::info("Shut down");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		ui::warn(&format!("Failed to listen for Ctrl+C: {}", e));
		std::future::pending::<()>().await;
	}
}
