// ---------------------------------------------------------------------------
// Catalog — movie and rating tables with snapshot identity
// ---------------------------------------------------------------------------
//
// Read-only source of truth for both similarity engines. Every mutation
// (replacing the movie table or the rating table) bumps the snapshot
// counter; derived indices record the snapshot they were built from, and
// a mismatch marks them stale.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::types::{Movie, MovieSummary, Rating};

/// Movie metadata table plus rating table, with title/id lookup indexes.
///
/// Row order is catalog order, which doubles as the deterministic
/// tie-break order for neighbor ranking.
#[derive(Debug, Default)]
pub struct Catalog {
	movies: Vec<Movie>,
	ratings: Vec<Rating>,
	title_index: HashMap<String, usize>,
	id_index: HashMap<u32, usize>,
	snapshot: u64,
}

impl Catalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_movies(movies: Vec<Movie>) -> Self {
		let mut catalog = Self::new();
		catalog.set_movies(movies);
		catalog
	}

	/// Replace the movie table. Rebuilds the lookup indexes and bumps the
	/// snapshot; any previously attached ratings that no longer match a
	/// catalog id are dropped.
	pub fn set_movies(&mut self, movies: Vec<Movie>) {
		self.title_index.clear();
		self.id_index.clear();
		for (row, movie) in movies.iter().enumerate() {
			// Titles are assumed unique; on collision the first row wins.
			if self.title_index.contains_key(&movie.title) {
				tracing::debug!(title = %movie.title, "duplicate title, keeping first row");
			} else {
				self.title_index.insert(movie.title.clone(), row);
			}
			self.id_index.entry(movie.id).or_insert(row);
		}
		self.movies = movies;
		let ratings = std::mem::take(&mut self.ratings);
		self.ratings = self.retain_known(ratings);
		self.snapshot += 1;
	}

	/// Replace the rating table. Ratings referring to movies outside the
	/// catalog are dropped (the crosswalk join happens upstream).
	pub fn set_ratings(&mut self, ratings: Vec<Rating>) {
		self.ratings = self.retain_known(ratings);
		self.snapshot += 1;
	}

	fn retain_known(&self, ratings: Vec<Rating>) -> Vec<Rating> {
		let before = ratings.len();
		let kept: Vec<Rating> = ratings
			.into_iter()
			.filter(|r| self.id_index.contains_key(&r.movie_id))
			.collect();
		if kept.len() < before {
			tracing::debug!(
				dropped = before - kept.len(),
				"dropped ratings with no catalog movie"
			);
		}
		kept
	}

	pub fn movies(&self) -> &[Movie] {
		&self.movies
	}

	pub fn ratings(&self) -> &[Rating] {
		&self.ratings
	}

	pub fn len(&self) -> usize {
		self.movies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.movies.is_empty()
	}

	/// Snapshot identity of the current movie+rating tables. Derived
	/// artifacts built from an older snapshot are stale.
	pub fn snapshot(&self) -> u64 {
		self.snapshot
	}

	pub fn row_by_title(&self, title: &str) -> Option<usize> {
		self.title_index.get(title).copied()
	}

	pub fn row_by_id(&self, id: u32) -> Option<usize> {
		self.id_index.get(&id).copied()
	}

	pub fn movie(&self, row: usize) -> &Movie {
		&self.movies[row]
	}

	/// Display record for one movie, for recommendation output.
	pub fn summary(&self, id: u32) -> Option<MovieSummary> {
		let row = self.row_by_id(id)?;
		let movie = &self.movies[row];
		Some(MovieSummary {
			title: movie.title.clone(),
			year: movie.year,
			director: movie.director.display(),
			genres: movie.genres.items(),
			tagline: movie.tagline.clone(),
		})
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::FieldValue;

	fn movie(id: u32, title: &str) -> Movie {
		Movie {
			id,
			title: title.to_string(),
			year: Some(1995),
			director: FieldValue::Scalar("Someone".to_string()),
			cast: FieldValue::Absent,
			keywords: FieldValue::Absent,
			genres: FieldValue::List(vec!["Drama".to_string()]),
			tagline: None,
		}
	}

	#[test]
	fn title_and_id_lookup() {
		let catalog = Catalog::from_movies(vec![movie(10, "Heat"), movie(20, "Casino")]);
		assert_eq!(catalog.row_by_title("Heat"), Some(0));
		assert_eq!(catalog.row_by_title("Casino"), Some(1));
		assert_eq!(catalog.row_by_title("Missing"), None);
		assert_eq!(catalog.row_by_id(20), Some(1));
	}

	#[test]
	fn snapshot_bumps_on_mutation() {
		let mut catalog = Catalog::new();
		let s0 = catalog.snapshot();
		catalog.set_movies(vec![movie(1, "A")]);
		let s1 = catalog.snapshot();
		assert!(s1 > s0);
		catalog.set_ratings(vec![Rating { user_id: 1, movie_id: 1, rating: 4.0 }]);
		assert!(catalog.snapshot() > s1);
	}

	#[test]
	fn unknown_movie_ratings_are_dropped() {
		let mut catalog = Catalog::from_movies(vec![movie(1, "A")]);
		catalog.set_ratings(vec![
			Rating { user_id: 1, movie_id: 1, rating: 4.0 },
			Rating { user_id: 1, movie_id: 99, rating: 5.0 },
		]);
		assert_eq!(catalog.ratings().len(), 1);
		assert_eq!(catalog.ratings()[0].movie_id, 1);
	}

	#[test]
	fn replacing_movies_drops_orphaned_ratings() {
		let mut catalog = Catalog::from_movies(vec![movie(1, "A"), movie(2, "B")]);
		catalog.set_ratings(vec![
			Rating { user_id: 1, movie_id: 1, rating: 4.0 },
			Rating { user_id: 1, movie_id: 2, rating: 3.0 },
		]);
		catalog.set_movies(vec![movie(2, "B")]);
		assert_eq!(catalog.ratings().len(), 1);
		assert_eq!(catalog.ratings()[0].movie_id, 2);
	}

	#[test]
	fn summary_joins_back_to_catalog() {
		let catalog = Catalog::from_movies(vec![movie(7, "Heat")]);
		let summary = catalog.summary(7).unwrap();
		assert_eq!(summary.title, "Heat");
		assert_eq!(summary.year, Some(1995));
		assert_eq!(summary.director.as_deref(), Some("Someone"));
		assert_eq!(summary.genres, vec!["Drama".to_string()]);
		assert!(catalog.summary(8).is_none());
	}
}
