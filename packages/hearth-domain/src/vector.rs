/// Element-wise arithmetic mean of equal-dimension vectors. This is a cheap
/// stand-in for a true multi-vector query; the index sees one centroid.
/// Empty input yields an empty vector.
pub fn mean(vectors: &[Vec<f32>]) -> Vec<f32> {
	let Some(first) = vectors.first() else {
		return Vec::new();
	};
	let dim = first.len();
	let mut out = vec![0.0_f32; dim];

	for vector in vectors {
		for (idx, value) in vector.iter().take(dim).enumerate() {
			out[idx] += value;
		}
	}
	for value in &mut out {
		*value /= vectors.len() as f32;
	}

	out
}
