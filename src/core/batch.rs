//! Incoming embedding batches

use anyhow::Result;
use serde::Deserialize;

use super::Embedding;

/// One uploaded file's embedding as sent by the upload pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingItem {
	pub vector: Vec<f32>,
	#[serde(default)]
	pub filename: Option<String>,
}

/// Body of `POST /cluster`
///
/// Other keys the uploader sends alongside (`imagesTakenTime`, `imagesTakenLocation`)
/// are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterRequest {
	pub embeddings: Vec<EmbeddingItem>,
}

impl ClusterRequest {
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(body)?)
	}
}

/// Validated batch: normalized embeddings with parallel file identifiers
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
	pub embeddings: Vec<Embedding>,
	pub file_ids: Vec<String>,
}

impl EmbeddingBatch {
	/// Validate a request and assign identifiers (filename, else positional index)
	pub fn from_request(request: ClusterRequest) -> Result<Self> {
		let Some(first) = request.embeddings.first() else {
			anyhow::bail!("No embeddings provided");
		};
		let dim = first.vector.len();
		if dim == 0 {
			anyhow::bail!("Embedding vectors must not be empty");
		}

		let mut embeddings = Vec::with_capacity(request.embeddings.len());
		let mut file_ids = Vec::with_capacity(request.embeddings.len());

		for (idx, item) in request.embeddings.into_iter().enumerate() {
			if item.vector.len() != dim {
				anyhow::bail!(
					"Inconsistent embedding dimensions: item {} has {} values, expected {}",
					idx,
					item.vector.len(),
					dim
				);
			}
			if item.vector.iter().any(|v| !v.is_finite()) {
				anyhow::bail!("Embedding {} contains non-finite values", idx);
			}

			file_ids.push(item.filename.unwrap_or_else(|| idx.to_string()));
			embeddings.push(Embedding::new(item.vector));
		}

		Ok(Self {
			embeddings,
			file_ids,
		})
	}

	pub fn len(&self) -> usize {
		self.embeddings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.embeddings.is_empty()
	}

	pub fn dim(&self) -> usize {
		self.embeddings.first().map(Embedding::dim).unwrap_or(0)
	}
}
