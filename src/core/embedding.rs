//! Normalized embedding vectors for cosine comparisons

#[derive(Debug, Clone)]
pub struct Embedding(Vec<f32>);

impl Embedding {
	/// Create normalized embedding from raw request data
	pub fn new(data: Vec<f32>) -> Self {
		Self(normalize(&data))
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	/// Cosine similarity [-1.0, 1.0], zero for zero vectors
	pub fn similarity(&self, other: &Self) -> f32 {
		self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
	}

	/// Cosine distance [0.0, 2.0]
	pub fn distance(&self, other: &Self) -> f32 {
		(1.0 - self.similarity(other)).max(0.0)
	}
}

fn normalize(v: &[f32]) -> Vec<f32> {
	let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
	if norm > 0.0 {
		v.iter().map(|x| x / norm).collect()
	} else {
		v.to_vec()
	}
}
