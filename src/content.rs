// ---------------------------------------------------------------------------
// Content Similarity Engine — pairwise cosine over soup count vectors
// ---------------------------------------------------------------------------
//
// Builds the full n x n cosine similarity matrix over all movie soups in
// one pass and answers ranked neighbor lookups from it. The matrix is
// immutable after build; a catalog change forces a full rebuild (there is
// no incremental update path).
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::soup;
use crate::types::Neighbor;
use crate::vectorizer::{cosine_with_magnitude, magnitude, CountVectorizer};

/// Symmetric movie-pair similarity matrix keyed by catalog snapshot.
pub struct ContentIndex {
	snapshot: u64,
	movie_ids: Vec<u32>,
	id_to_row: HashMap<u32, usize>,
	matrix: Vec<Vec<f64>>,
}

impl ContentIndex {
	/// Encode every movie's soup, vectorize the corpus, and compute all
	/// pairwise cosine similarities.
	pub fn build(catalog: &Catalog) -> Result<Self, EngineError> {
		if catalog.is_empty() {
			return Err(EngineError::EmptyCatalog);
		}
		let started = Instant::now();

		let soups: Vec<String> = catalog.movies().iter().map(soup::encode).collect();
		let (vocabulary, vectors) = CountVectorizer::new().fit_transform(&soups);
		let magnitudes: Vec<f64> = vectors.iter().map(magnitude).collect();

		let n = vectors.len();
		let mut matrix = vec![vec![0.0f64; n]; n];
		for i in 0..n {
			// An empty soup is a zero vector: similar to nothing, itself included.
			matrix[i][i] = if magnitudes[i] > 0.0 { 1.0 } else { 0.0 };
			for j in (i + 1)..n {
				let sim = cosine_with_magnitude(
					&vectors[i],
					&vectors[j],
					magnitudes[i],
					magnitudes[j],
				);
				matrix[i][j] = sim;
				matrix[j][i] = sim;
			}
		}

		let movie_ids: Vec<u32> = catalog.movies().iter().map(|m| m.id).collect();
		let id_to_row: HashMap<u32, usize> = movie_ids
			.iter()
			.enumerate()
			.map(|(row, &id)| (id, row))
			.collect();

		tracing::debug!(
			movies = n,
			vocabulary = vocabulary.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"content index built"
		);

		Ok(Self {
			snapshot: catalog.snapshot(),
			movie_ids,
			id_to_row,
			matrix,
		})
	}

	/// Snapshot of the catalog this index was built from.
	pub fn snapshot(&self) -> u64 {
		self.snapshot
	}

	pub fn len(&self) -> usize {
		self.movie_ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.movie_ids.is_empty()
	}

	/// Pairwise similarity by movie id; `None` when either id is unknown.
	pub fn similarity(&self, a: u32, b: u32) -> Option<f64> {
		let ra = *self.id_to_row.get(&a)?;
		let rb = *self.id_to_row.get(&b)?;
		Some(self.matrix[ra][rb])
	}

	/// Ranked neighbors of `movie_id`: every other movie sorted by
	/// similarity descending, ties broken by catalog order (stable sort),
	/// the query itself excluded, truncated to `k`. Unknown ids yield an
	/// empty list.
	pub fn neighbors(&self, movie_id: u32, k: usize) -> Vec<Neighbor> {
		let row = match self.id_to_row.get(&movie_id) {
			Some(&row) => row,
			None => return Vec::new(),
		};

		let mut scored: Vec<(usize, f64)> = self.matrix[row]
			.iter()
			.enumerate()
			.filter(|&(other, _)| other != row)
			.map(|(other, &sim)| (other, sim))
			.collect();
		scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
		scored.truncate(k);

		scored
			.into_iter()
			.map(|(other, score)| Neighbor {
				movie_id: self.movie_ids[other],
				score,
			})
			.collect()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
