// ---------------------------------------------------------------------------
// Collaborative Similarity Engine — rating pivot + item similarity
// ---------------------------------------------------------------------------
//
// Pivots the rating table into per-movie columns of (user, rating) pairs
// and ranks neighbor movies by rating-pattern similarity. The similarity
// method is pluggable behind `ItemSimilarity`: a Pearson-correlation
// strategy over shared raters, and an item-item cosine model trained on a
// configurable (optionally seeded) split of the ratings.
//
// Missing ratings are absent, never zero: every statistic here runs over
// the raters two movies actually share.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::types::Neighbor;

/// Neighbor window used when the caller passes `k = 0`.
pub const DEFAULT_WINDOW: usize = 10;

/// Minimum shared raters for a correlation to be considered valid.
const MIN_OVERLAP: usize = 2;

// ---------------------------------------------------------------------------
// RatingMatrix
// ---------------------------------------------------------------------------

/// User-by-movie rating pivot, stored column-major and sparse. Each column
/// holds (user row, rating) pairs sorted by user row, so pairwise passes
/// are merge walks. Immutable after build, keyed by catalog snapshot.
pub struct RatingMatrix {
	snapshot: u64,
	movie_ids: Vec<u32>,
	id_to_col: HashMap<u32, usize>,
	columns: Vec<Vec<(u32, f64)>>,
	user_count: usize,
}

impl RatingMatrix {
	/// Pivot the catalog's rating table. Every catalog movie gets a column
	/// (possibly empty) in catalog order. A duplicate (user, movie) pair is
	/// a precondition violation; the last rating wins.
	pub fn build(catalog: &Catalog) -> Result<Self, EngineError> {
		if catalog.is_empty() {
			return Err(EngineError::EmptyCatalog);
		}
		let started = Instant::now();

		// Dense user rows in first-appearance order; the rating table is a
		// Vec, so row assignment is deterministic.
		let mut user_rows: BTreeMap<u32, u32> = BTreeMap::new();
		for rating in catalog.ratings() {
			let next = user_rows.len() as u32;
			user_rows.entry(rating.user_id).or_insert(next);
		}

		let movie_ids: Vec<u32> = catalog.movies().iter().map(|m| m.id).collect();
		let id_to_col: HashMap<u32, usize> = movie_ids
			.iter()
			.enumerate()
			.map(|(col, &id)| (id, col))
			.collect();

		let mut cells: Vec<HashMap<u32, f64>> = vec![HashMap::new(); movie_ids.len()];
		for rating in catalog.ratings() {
			// set_ratings already dropped unknown movie ids.
			if let Some(&col) = id_to_col.get(&rating.movie_id) {
				let row = user_rows[&rating.user_id];
				cells[col].insert(row, rating.rating);
			}
		}

		let columns: Vec<Vec<(u32, f64)>> = cells
			.into_iter()
			.map(|cell| {
				let mut column: Vec<(u32, f64)> = cell.into_iter().collect();
				column.sort_by_key(|&(row, _)| row);
				column
			})
			.collect();

		tracing::debug!(
			users = user_rows.len(),
			movies = movie_ids.len(),
			ratings = catalog.ratings().len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"rating matrix built"
		);

		Ok(Self {
			snapshot: catalog.snapshot(),
			movie_ids,
			id_to_col,
			columns,
			user_count: user_rows.len(),
		})
	}

	pub fn snapshot(&self) -> u64 {
		self.snapshot
	}

	pub fn user_count(&self) -> usize {
		self.user_count
	}

	pub fn movie_count(&self) -> usize {
		self.movie_ids.len()
	}

	pub fn column_of(&self, movie_id: u32) -> Option<usize> {
		self.id_to_col.get(&movie_id).copied()
	}

	pub fn movie_id(&self, col: usize) -> u32 {
		self.movie_ids[col]
	}

	/// Ratings for one movie as (user row, rating) pairs sorted by user row.
	pub fn column(&self, col: usize) -> &[(u32, f64)] {
		&self.columns[col]
	}
}

// ---------------------------------------------------------------------------
// ItemSimilarity strategy interface
// ---------------------------------------------------------------------------

/// Pluggable item-to-item similarity over a rating pivot.
///
/// Implementations rank every candidate movie against the query movie,
/// descending by score with ties broken by catalog order, never returning
/// the query itself. `k = 0` selects the strategy's default window
/// (`DEFAULT_WINDOW`).
pub trait ItemSimilarity {
	fn neighbors(&self, matrix: &RatingMatrix, movie_id: u32, k: usize) -> Vec<Neighbor>;
}

fn effective_window(k: usize) -> usize {
	if k == 0 {
		DEFAULT_WINDOW
	} else {
		k
	}
}

/// Stable descending sort by score, then truncate; ties keep column order.
fn rank(mut scored: Vec<(usize, f64)>, matrix: &RatingMatrix, k: usize) -> Vec<Neighbor> {
	scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
	scored.truncate(effective_window(k));
	scored
		.into_iter()
		.map(|(col, score)| Neighbor {
			movie_id: matrix.movie_id(col),
			score,
		})
		.collect()
}

// ---------------------------------------------------------------------------
// Pearson correlation strategy
// ---------------------------------------------------------------------------

/// Pearson correlation between the query movie's ratings and each
/// candidate's, computed over their shared raters. Candidates with fewer
/// than two shared raters, or with constant ratings over the shared set,
/// have no valid correlation and are discarded.
#[derive(Debug, Default)]
pub struct PearsonCorrelation;

/// Pearson correlation over the raters both columns share. `None` when the
/// overlap is too small or either side has zero variance on it.
pub fn pearson(a: &[(u32, f64)], b: &[(u32, f64)]) -> Option<f64> {
	let mut xs: Vec<f64> = Vec::new();
	let mut ys: Vec<f64> = Vec::new();
	let (mut i, mut j) = (0usize, 0usize);
	while i < a.len() && j < b.len() {
		match a[i].0.cmp(&b[j].0) {
			std::cmp::Ordering::Less => i += 1,
			std::cmp::Ordering::Greater => j += 1,
			std::cmp::Ordering::Equal => {
				xs.push(a[i].1);
				ys.push(b[j].1);
				i += 1;
				j += 1;
			}
		}
	}

	let n = xs.len();
	if n < MIN_OVERLAP {
		return None;
	}

	let nf = n as f64;
	let mean_x = xs.iter().sum::<f64>() / nf;
	let mean_y = ys.iter().sum::<f64>() / nf;

	let mut cov = 0.0;
	let mut var_x = 0.0;
	let mut var_y = 0.0;
	for idx in 0..n {
		let dx = xs[idx] - mean_x;
		let dy = ys[idx] - mean_y;
		cov += dx * dy;
		var_x += dx * dx;
		var_y += dy * dy;
	}

	if var_x == 0.0 || var_y == 0.0 {
		return None;
	}

	Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

impl ItemSimilarity for PearsonCorrelation {
	fn neighbors(&self, matrix: &RatingMatrix, movie_id: u32, k: usize) -> Vec<Neighbor> {
		let query_col = match matrix.column_of(movie_id) {
			Some(col) => col,
			None => return Vec::new(),
		};
		let query = matrix.column(query_col);
		if query.is_empty() {
			return Vec::new();
		}

		let mut scored: Vec<(usize, f64)> = Vec::new();
		for col in 0..matrix.movie_count() {
			if col == query_col {
				continue;
			}
			if let Some(r) = pearson(query, matrix.column(col)) {
				scored.push((col, r));
			}
		}
		rank(scored, matrix, k)
	}
}

// ---------------------------------------------------------------------------
// Item-item cosine model
// ---------------------------------------------------------------------------

/// Training configuration for `CosineModel`.
///
/// `test_size` is the fraction of ratings held out of training. With
/// `seed: None` the split is drawn from entropy and neighbor lists are NOT
/// reproducible across rebuilds; pass a seed to pin the split.
#[derive(Debug, Clone)]
pub struct CosineModelConfig {
	pub test_size: f64,
	pub seed: Option<u64>,
}

impl Default for CosineModelConfig {
	fn default() -> Self {
		Self {
			test_size: 0.1,
			seed: None,
		}
	}
}

/// Item-based cosine similarity: for each candidate, the cosine of the raw
/// rating vectors over the raters it shares with the query, computed on the
/// training split. Candidates sharing no raters with the query are
/// discarded.
#[derive(Debug, Default)]
pub struct CosineModel {
	config: CosineModelConfig,
}

impl CosineModel {
	pub fn new(config: CosineModelConfig) -> Self {
		Self { config }
	}

	/// The training split as per-movie columns, shaped like the pivot.
	fn train_columns(&self, matrix: &RatingMatrix) -> Vec<Vec<(u32, f64)>> {
		let test_size = self.config.test_size.clamp(0.0, 1.0);
		if test_size == 0.0 {
			return (0..matrix.movie_count())
				.map(|col| matrix.column(col).to_vec())
				.collect();
		}

		let mut triples: Vec<(usize, u32, f64)> = Vec::new();
		for col in 0..matrix.movie_count() {
			for &(row, rating) in matrix.column(col) {
				triples.push((col, row, rating));
			}
		}

		let mut rng = match self.config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		triples.shuffle(&mut rng);

		let train_len =
			((triples.len() as f64) * (1.0 - test_size)).round() as usize;
		triples.truncate(train_len);

		let mut columns: Vec<Vec<(u32, f64)>> = vec![Vec::new(); matrix.movie_count()];
		for (col, row, rating) in triples {
			columns[col].push((row, rating));
		}
		for column in &mut columns {
			column.sort_by_key(|&(row, _)| row);
		}
		columns
	}
}

/// Cosine over shared raters only; `None` when no rater is shared.
fn shared_cosine(a: &[(u32, f64)], b: &[(u32, f64)]) -> Option<f64> {
	let mut dot = 0.0;
	let mut norm_a = 0.0;
	let mut norm_b = 0.0;
	let mut shared = 0usize;

	let (mut i, mut j) = (0usize, 0usize);
	while i < a.len() && j < b.len() {
		match a[i].0.cmp(&b[j].0) {
			std::cmp::Ordering::Less => i += 1,
			std::cmp::Ordering::Greater => j += 1,
			std::cmp::Ordering::Equal => {
				dot += a[i].1 * b[j].1;
				norm_a += a[i].1 * a[i].1;
				norm_b += b[j].1 * b[j].1;
				shared += 1;
				i += 1;
				j += 1;
			}
		}
	}

	if shared == 0 {
		return None;
	}
	let denom = norm_a.sqrt() * norm_b.sqrt();
	if denom == 0.0 {
		return None;
	}
	Some((dot / denom).clamp(-1.0, 1.0))
}

impl ItemSimilarity for CosineModel {
	fn neighbors(&self, matrix: &RatingMatrix, movie_id: u32, k: usize) -> Vec<Neighbor> {
		let query_col = match matrix.column_of(movie_id) {
			Some(col) => col,
			None => return Vec::new(),
		};

		let columns = self.train_columns(matrix);
		let query = &columns[query_col];
		if query.is_empty() {
			return Vec::new();
		}

		let mut scored: Vec<(usize, f64)> = Vec::new();
		for (col, column) in columns.iter().enumerate() {
			if col == query_col {
				continue;
			}
			if let Some(sim) = shared_cosine(query, column) {
				scored.push((col, sim));
			}
		}
		rank(scored, matrix, k)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
