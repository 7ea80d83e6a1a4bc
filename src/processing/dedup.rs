//! Near-duplicate removal by cosine similarity

use rayon::prelude::*;

use crate::core::{Embedding, EmbeddingBatch};
use crate::ui;

/// Batch with near-duplicates removed
#[derive(Debug, Clone)]
pub struct Deduplicated {
	pub batch: EmbeddingBatch,
	/// Removed identifiers, in the order they were marked
	pub duplicates: Vec<String>,
}

/// Pairwise cosine similarity with a zeroed diagonal
pub fn similarity_matrix(embeddings: &[Embedding]) -> Vec<Vec<f32>> {
	let n = embeddings.len();

	(0..n)
		.into_par_iter()
		.map(|i| {
			(0..n)
				.map(|j| {
					if i == j {
						0.0
					} else {
						embeddings[i].similarity(&embeddings[j])
					}
				})
				.collect()
		})
		.collect()
}

/// Remove every item whose similarity to an earlier surviving item exceeds `threshold`.
///
/// Rows are scanned in input order and each surviving row removes all of its
/// near-duplicates at once. An item removed by an earlier row never gets a row of its
/// own, so duplicate chains are not followed: with A~B and B~C but not A~C, scanning
/// A removes B and C survives.
pub fn remove_duplicates(batch: EmbeddingBatch, threshold: f32) -> Deduplicated {
	let n = batch.len();
	let similarity = similarity_matrix(&batch.embeddings);

	let mut removed = vec![false; n];
	let mut duplicate_indices = Vec::new();

	for i in 0..n {
		if removed[i] {
			continue;
		}
		for (j, &score) in similarity[i].iter().enumerate() {
			if j != i && !removed[j] && score > threshold {
				removed[j] = true;
				duplicate_indices.push(j);
			}
		}
	}

	let duplicates: Vec<String> = duplicate_indices
		.iter()
		.map(|&j| batch.file_ids[j].clone())
		.collect();

	let (embeddings, file_ids): (Vec<Embedding>, Vec<String>) = batch
		.embeddings
		.into_iter()
		.zip(batch.file_ids)
		.zip(removed)
		.filter(|(_, is_removed)| !is_removed)
		.map(|(pair, _)| pair)
		.unzip();

	if !duplicates.is_empty() {
		ui::info(&format!(
			"Removed {} near-duplicates (similarity > {:.2})",
			duplicates.len(),
			threshold
		));
	}
	ui::debug(&format!("{} of {} embeddings kept", n - duplicates.len(), n));

	Deduplicated {
		batch: EmbeddingBatch {
			embeddings,
			file_ids,
		},
		duplicates,
	}
}
