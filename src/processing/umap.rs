//! UMAP dimensionality reduction over cosine neighborhoods

use anyhow::{Context, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rayon::prelude::*;
use umap_rs::{Metric, Optimizer, SparseMat, Umap, UmapConfig};

use crate::core::{Embedding, ReductionParams};
use crate::ui;

/// Power iterations per spectral component
const SPECTRAL_ITERATIONS: usize = 300;

/// Largest per-entry change at which a spectral component counts as converged
const SPECTRAL_TOLERANCE: f64 = 1e-7;

/// Cosine distance in the input space. Antipodal vectors are disconnected.
#[derive(Debug, Clone, Copy)]
struct CosineMetric;

impl Metric for CosineMetric {
	fn distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> (f32, Array1<f32>) {
		let dot = a.dot(&b);
		let norm_a = a.dot(&a).sqrt();
		let norm_b = b.dot(&b).sqrt();
		if norm_a == 0.0 || norm_b == 0.0 {
			return (1.0, Array1::zeros(a.len()));
		}
		let similarity = dot / (norm_a * norm_b);
		let grad = &a * (similarity / (norm_a * norm_a)) - &b / (norm_a * norm_b);
		(1.0 - similarity, grad)
	}

	fn disconnection_threshold(&self) -> f32 {
		2.0
	}
}

/// Euclidean distance in the reduced space.
///
/// Reported as a generic metric so umap-rs runs its generic SGD kernel; the
/// specialized Euclidean kernel in umap-rs 0.4 computes the attraction term as
/// `a * d^(2b) * d^2 + 1`, which stalls any pair further apart than about 1.
#[derive(Debug, Clone, Copy)]
struct LayoutMetric;

impl Metric for LayoutMetric {
	fn distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> (f32, Array1<f32>) {
		let diff = &a - &b;
		let dist = diff.dot(&diff).sqrt();
		(dist, diff / (dist + 1e-6))
	}
}

/// Reduce embeddings to `params.n_components` dimensions using UMAP
pub fn reduce_embeddings(
	embeddings: &[Embedding],
	params: &ReductionParams,
) -> Result<Vec<Vec<f32>>> {
	let n_samples = embeddings.len();
	if n_samples < 3 {
		anyhow::bail!("UMAP needs at least 3 embeddings, got {}", n_samples);
	}
	if params.n_neighbors < 2 {
		anyhow::bail!("UMAP needs at least 2 neighbors, got {}", params.n_neighbors);
	}
	let n_features = embeddings[0].dim();
	let n_components = params.n_components;

	// Neighbor lists count the point itself, so at most every other point fits
	let n_neighbors = if params.n_neighbors >= n_samples {
		ui::warn(&format!(
			"n_neighbors={} is not smaller than the batch size {}; using {}",
			params.n_neighbors,
			n_samples,
			n_samples - 1
		));
		n_samples - 1
	} else {
		params.n_neighbors
	};

	ui::info(&format!(
		"Reducing {}D to {}D using UMAP",
		n_features, n_components
	));
	ui::debug(&format!(
		"UMAP neighbors: {}, min_dist: {}, metric: cosine",
		n_neighbors, params.min_dist
	));

	let flat: Vec<f32> = embeddings
		.iter()
		.flat_map(|emb| emb.as_slice().iter().copied())
		.collect();
	let data = Array2::from_shape_vec((n_samples, n_features), flat)
		.context("Embeddings do not form a rectangular matrix")?;

	ui::debug("Computing K-nearest neighbors...");
	let (knn_indices, knn_distances) = compute_knn(embeddings, n_neighbors);

	// umap-rs takes u32 neighbor indices
	let knn_indices_array =
		Array2::from_shape_fn((n_samples, n_neighbors), |(i, j)| knn_indices[i][j] as u32);
	let knn_dists_array =
		Array2::from_shape_fn((n_samples, n_neighbors), |(i, j)| knn_distances[i][j]);

	let config = UmapConfig {
		n_components,
		manifold: umap_rs::ManifoldParams {
			min_dist: params.min_dist,
			..Default::default()
		},
		graph: umap_rs::GraphParams {
			n_neighbors,
			..Default::default()
		},
		..Default::default()
	};

	let umap = Umap::with_metrics(config.clone(), Box::new(CosineMetric), Box::new(LayoutMetric));

	ui::debug("Building fuzzy neighbor graph...");
	let manifold = umap.learn_manifold(
		data.view(),
		knn_indices_array.view(),
		knn_dists_array.view(),
	);

	let init = spectral_layout(manifold.graph(), n_components, params.seed);

	let total_epochs = config
		.optimization
		.n_epochs
		.unwrap_or(if n_samples <= 10_000 { 500 } else { 200 });

	ui::debug(&format!("Running UMAP optimization ({} epochs)...", total_epochs));

	let mut optimizer = Optimizer::new(
		manifold,
		init,
		total_epochs,
		&config,
		LayoutMetric.metric_type(),
	);
	optimizer.step_epochs(total_epochs, &LayoutMetric);

	let embedding = optimizer.embedding();

	let result: Vec<Vec<f32>> = (0..n_samples)
		.map(|i| (0..n_components).map(|j| embedding[[i, j]]).collect())
		.collect();

	if result.iter().flatten().any(|v| !v.is_finite()) {
		anyhow::bail!("UMAP produced non-finite coordinates");
	}

	ui::debug("UMAP reduction complete");

	Ok(result)
}

type KnnResult = (Vec<Vec<usize>>, Vec<Vec<f32>>);

/// Brute-force K-nearest neighbors under cosine distance.
///
/// Column 0 of every row is the point itself at distance 0, as umap-rs expects.
fn compute_knn(embeddings: &[Embedding], k: usize) -> KnnResult {
	let n_samples = embeddings.len();

	ui::debug(&format!(
		"Computing KNN (brute force) for {} samples, k={}",
		n_samples, k
	));

	let results: Vec<(Vec<usize>, Vec<f32>)> = (0..n_samples)
		.into_par_iter()
		.map(|i| {
			let mut distances: Vec<(usize, f32)> = (0..n_samples)
				.filter(|&j| i != j)
				.map(|j| (j, embeddings[i].distance(&embeddings[j])))
				.collect();

			distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
			distances.truncate(k.saturating_sub(1));

			let (indices, dists): (Vec<usize>, Vec<f32>) = std::iter::once((i, 0.0))
				.chain(distances)
				.unzip();
			(indices, dists)
		})
		.collect();

	results.into_iter().unzip()
}

/// Initial layout from the leading eigenvectors of the graph's normalized Laplacian.
///
/// Uses power iteration on `I + D^-1/2 W D^-1/2`, whose top eigenvectors are the
/// Laplacian's bottom ones, deflating the trivial `sqrt(degree)` vector first.
/// The layout is scaled to `[-10, 10]` with a little seeded jitter so no
/// dimension is constant.
fn spectral_layout(graph: &SparseMat, n_components: usize, seed: Option<u64>) -> Array2<f32> {
	let seed = seed.unwrap_or_else(|| rand::rng().random_range(0..u64::MAX));
	ui::debug(&format!("UMAP init seed: {}", seed));
	let mut rng = StdRng::seed_from_u64(seed);

	let rows: Vec<Vec<(usize, f64)>> = graph
		.outer_iterator()
		.map(|row| {
			row.indices()
				.iter()
				.zip(row.data())
				.map(|(&j, &w)| (j as usize, w as f64))
				.collect()
		})
		.collect();
	let n_samples = rows.len();

	let degree: Vec<f64> = rows
		.iter()
		.map(|row| row.iter().map(|&(_, w)| w).sum())
		.collect();
	let inv_sqrt_degree: Vec<f64> = degree
		.iter()
		.map(|&d| if d > 0.0 { d.sqrt().recip() } else { 0.0 })
		.collect();

	let apply = |v: &[f64]| -> Vec<f64> {
		rows.par_iter()
			.enumerate()
			.map(|(i, row)| {
				let neighbors: f64 = row
					.iter()
					.map(|&(j, w)| w * inv_sqrt_degree[j] * v[j])
					.sum();
				v[i] + inv_sqrt_degree[i] * neighbors
			})
			.collect()
	};

	let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n_components + 1);
	if let Some(trivial) = normalized(degree.iter().map(|d| d.sqrt()).collect()) {
		basis.push(trivial);
	}

	let mut layout = Array2::<f32>::zeros((n_samples, n_components));
	for component in 0..n_components {
		let mut start: Vec<f64> = (0..n_samples).map(|_| rng.random_range(-1.0..1.0)).collect();
		orthogonalize(&mut start, &basis);
		// Fewer non-trivial eigenvectors than components: leave the column to the jitter
		let Some(mut v) = normalized(start) else {
			continue;
		};

		for _ in 0..SPECTRAL_ITERATIONS {
			let mut next = apply(&v);
			orthogonalize(&mut next, &basis);
			let Some(next) = normalized(next) else {
				break;
			};
			let delta = next
				.iter()
				.zip(&v)
				.map(|(a, b)| (a - b).abs())
				.fold(0.0, f64::max);
			v = next;
			if delta < SPECTRAL_TOLERANCE {
				break;
			}
		}

		for (i, &value) in v.iter().enumerate() {
			layout[[i, component]] = value as f32;
		}
		basis.push(v);
	}

	let max_abs = layout.iter().fold(0.0f32, |m, v| m.max(v.abs()));
	let expansion = if max_abs > 0.0 { 10.0 / max_abs } else { 1.0 };
	layout.mapv_inplace(|v| v * expansion + rng.random_range(-1e-4f32..1e-4f32));
	layout
}

/// Remove the components of `v` along each (unit) basis vector
fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
	for b in basis {
		let projection: f64 = v.iter().zip(b).map(|(x, y)| x * y).sum();
		for (x, y) in v.iter_mut().zip(b) {
			*x -= projection * y;
		}
	}
}

fn normalized(mut v: Vec<f64>) -> Option<Vec<f64>> {
	let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
	if norm < 1e-12 {
		return None;
	}
	v.iter_mut().for_each(|x| *x /= norm);
	Some(v)
}
