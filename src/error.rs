//! HTTP error responses

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::json;

use crate::ui;

/// Any failure while handling a request.
///
/// Bad input and internal faults are not distinguished: every error becomes
/// `500 {"error": message}`.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
	E: Into<anyhow::Error>,
{
	fn from(err: E) -> Self {
		Self(err.into())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let message = self.0.to_string();
		ui::error(&format!("Error during clustering: {:#}", self.0));

		let body = Json(json!({ "error": message }));
		(StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
	}
}
