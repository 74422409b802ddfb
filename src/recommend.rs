// ---------------------------------------------------------------------------
// Recommender — strategy dispatch and hybrid fusion
// ---------------------------------------------------------------------------
//
// Integrates the catalog, the content similarity engine, and the
// collaborative engine behind one `recommend(title, k, strategy)` call.
// Both derived indices are memoized against the catalog snapshot: `build`
// constructs them explicitly, and a recommend call against a mutated
// catalog rebuilds the stale index transparently (logged, since the
// rebuild is the expensive O(n^2) step).
//
// Hybrid fusion is display-level: the content list and the collaborative
// list are returned as two labeled groups, verbatim and in full, with no
// deduplication or score reconciliation. Score-level fusion (a weighted
// sum over normalized scores) would be an enhancement with different
// output semantics, not a drop-in change.
// ---------------------------------------------------------------------------

use crate::catalog::Catalog;
use crate::collab::{ItemSimilarity, PearsonCorrelation, RatingMatrix};
use crate::content::ContentIndex;
use crate::error::EngineError;
use crate::types::{
	MovieSummary, Neighbor, RecommendationGroup, RecommendationResult, Strategy,
};

/// Label of the content-based group in recommendation output.
pub const CONTENT_GROUP: &str = "recommendations";
/// Label of the collaborative group ("users also like").
pub const COLLAB_GROUP: &str = "users also like";

/// Movie recommender combining content and collaborative neighbor search.
pub struct Recommender {
	catalog: Catalog,
	item_similarity: Box<dyn ItemSimilarity>,
	content: Option<ContentIndex>,
	ratings: Option<RatingMatrix>,
}

impl Recommender {
	/// Recommender with the default Pearson-correlation collaborative
	/// strategy.
	pub fn new(catalog: Catalog) -> Self {
		Self::with_item_similarity(catalog, Box::new(PearsonCorrelation))
	}

	pub fn with_item_similarity(catalog: Catalog, item_similarity: Box<dyn ItemSimilarity>) -> Self {
		Self {
			catalog,
			item_similarity,
			content: None,
			ratings: None,
		}
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	/// Mutable catalog access. Any change bumps the snapshot, so the next
	/// recommend call rebuilds whichever indices went stale.
	pub fn catalog_mut(&mut self) -> &mut Catalog {
		&mut self.catalog
	}

	/// Explicitly build both derived indices for the current snapshot.
	pub fn build(&mut self) -> Result<(), EngineError> {
		self.ensure_fresh()
	}

	fn ensure_fresh(&mut self) -> Result<(), EngineError> {
		let snapshot = self.catalog.snapshot();

		let content_stale = self.content.as_ref().map(|c| c.snapshot()) != Some(snapshot);
		if content_stale {
			if self.content.is_some() {
				tracing::info!(snapshot, "content index stale, rebuilding");
			}
			self.content = Some(ContentIndex::build(&self.catalog)?);
		}

		let ratings_stale = self.ratings.as_ref().map(|m| m.snapshot()) != Some(snapshot);
		if ratings_stale {
			if self.ratings.is_some() {
				tracing::info!(snapshot, "rating matrix stale, rebuilding");
			}
			self.ratings = Some(RatingMatrix::build(&self.catalog)?);
		}

		Ok(())
	}

	fn summaries(&self, neighbors: &[Neighbor]) -> Vec<MovieSummary> {
		neighbors
			.iter()
			.filter_map(|n| self.catalog.summary(n.movie_id))
			.collect()
	}

	/// Recommend up to `k` movies per strategy group for the given seed
	/// title. An unknown title (or an empty catalog) yields an empty
	/// result, never an error; `k = 0` leaves the collaborative window at
	/// its default of 10 and returns everything content-side.
	pub fn recommend(
		&mut self,
		title: &str,
		k: usize,
		strategy: Strategy,
	) -> Result<RecommendationResult, EngineError> {
		if self.catalog.is_empty() {
			return Ok(RecommendationResult::default());
		}
		let movie_id = match self.catalog.row_by_title(title) {
			Some(row) => self.catalog.movie(row).id,
			None => {
				tracing::debug!(title, "title not in catalog, empty result");
				return Ok(RecommendationResult::default());
			}
		};

		self.ensure_fresh()?;

		let mut groups: Vec<RecommendationGroup> = Vec::new();

		if matches!(strategy, Strategy::Content | Strategy::Hybrid) {
			// `k = 0` means "no limit" for the content list.
			let limit = if k == 0 { self.catalog.len() } else { k };
			let content = self.content.as_ref().expect("content index built");
			let neighbors = content.neighbors(movie_id, limit);
			groups.push(RecommendationGroup {
				label: CONTENT_GROUP.to_string(),
				entries: self.summaries(&neighbors),
			});
		}

		if matches!(strategy, Strategy::Collaborative | Strategy::Hybrid) {
			let matrix = self.ratings.as_ref().expect("rating matrix built");
			let neighbors = self.item_similarity.neighbors(matrix, movie_id, k);
			groups.push(RecommendationGroup {
				label: COLLAB_GROUP.to_string(),
				entries: self.summaries(&neighbors),
			});
		}

		Ok(RecommendationResult { groups })
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{FieldValue, Movie, Rating};

	fn movie(id: u32, title: &str, keywords: &[&str]) -> Movie {
		Movie {
			id,
			title: title.to_string(),
			year: Some(2000 + id as i32),
			director: FieldValue::Scalar("Jane Doe".to_string()),
			cast: FieldValue::Absent,
			keywords: FieldValue::List(keywords.iter().map(|s| s.to_string()).collect()),
			genres: FieldValue::List(vec!["Drama".to_string()]),
			tagline: None,
		}
	}

	fn rating(user_id: u32, movie_id: u32, value: f64) -> Rating {
		Rating {
			user_id,
			movie_id,
			rating: value,
		}
	}

	fn seeded_recommender() -> Recommender {
		let mut catalog = Catalog::from_movies(vec![
			movie(1, "Alpha", &["space", "crew"]),
			movie(2, "Beta", &["space", "crew"]),
			movie(3, "Gamma", &["romance"]),
		]);
		catalog.set_ratings(vec![
			rating(1, 1, 5.0),
			rating(2, 1, 4.0),
			rating(3, 1, 5.0),
			rating(1, 2, 5.0),
			rating(2, 2, 4.0),
			rating(3, 2, 5.0),
			rating(1, 3, 1.0),
			rating(2, 3, 5.0),
			rating(3, 3, 2.0),
		]);
		Recommender::new(catalog)
	}

	#[test]
	fn unknown_title_yields_empty_result() {
		let mut rec = seeded_recommender();
		let result = rec.recommend("NonexistentTitle", 5, Strategy::Content).unwrap();
		assert!(result.is_empty());
	}

	#[test]
	fn empty_catalog_yields_empty_result() {
		let mut rec = Recommender::new(Catalog::new());
		let result = rec.recommend("Alpha", 5, Strategy::Hybrid).unwrap();
		assert!(result.is_empty());
	}

	#[test]
	fn content_strategy_returns_single_labeled_group() {
		let mut rec = seeded_recommender();
		let result = rec.recommend("Alpha", 2, Strategy::Content).unwrap();
		assert_eq!(result.groups.len(), 1);
		assert_eq!(result.groups[0].label, CONTENT_GROUP);
		assert_eq!(result.groups[0].entries[0].title, "Beta");
	}

	#[test]
	fn collaborative_strategy_returns_single_labeled_group() {
		let mut rec = seeded_recommender();
		let result = rec.recommend("Alpha", 2, Strategy::Collaborative).unwrap();
		assert_eq!(result.groups.len(), 1);
		assert_eq!(result.groups[0].label, COLLAB_GROUP);
		assert_eq!(result.groups[0].entries[0].title, "Beta");
	}

	#[test]
	fn hybrid_concatenates_both_groups_without_dedup() {
		let mut rec = seeded_recommender();
		let content = rec.recommend("Alpha", 5, Strategy::Content).unwrap();
		let collab = rec.recommend("Alpha", 5, Strategy::Collaborative).unwrap();
		let hybrid = rec.recommend("Alpha", 5, Strategy::Hybrid).unwrap();

		assert_eq!(hybrid.groups.len(), 2);
		assert_eq!(hybrid.groups[0].label, CONTENT_GROUP);
		assert_eq!(hybrid.groups[1].label, COLLAB_GROUP);
		// Display-level fusion: combined length is the plain sum, overlap kept.
		assert_eq!(hybrid.len(), content.len() + collab.len());
	}

	#[test]
	fn recommend_is_idempotent_for_unchanged_snapshot() {
		let mut rec = seeded_recommender();
		let first = rec.recommend("Alpha", 3, Strategy::Hybrid).unwrap();
		let second = rec.recommend("Alpha", 3, Strategy::Hybrid).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn build_is_explicit_and_recommend_reuses_indices() {
		let mut rec = seeded_recommender();
		rec.build().unwrap();
		let snapshot = rec.catalog().snapshot();
		rec.recommend("Alpha", 3, Strategy::Hybrid).unwrap();
		assert_eq!(rec.catalog().snapshot(), snapshot);
	}

	#[test]
	fn stale_index_is_rebuilt_after_catalog_change() {
		let mut rec = seeded_recommender();
		rec.build().unwrap();

		// Replacing ratings bumps the snapshot; recommend must still work
		// and reflect the new data.
		rec.catalog_mut().set_ratings(vec![
			rating(1, 1, 5.0),
			rating(2, 1, 1.0),
			rating(1, 3, 5.0),
			rating(2, 3, 1.0),
		]);
		let result = rec.recommend("Alpha", 5, Strategy::Collaborative).unwrap();
		assert_eq!(result.groups[0].entries[0].title, "Gamma");
	}

	#[test]
	fn summaries_carry_catalog_fields() {
		let mut rec = seeded_recommender();
		let result = rec.recommend("Alpha", 1, Strategy::Content).unwrap();
		let entry = &result.groups[0].entries[0];
		assert_eq!(entry.year, Some(2002));
		assert_eq!(entry.director.as_deref(), Some("Jane Doe"));
		assert_eq!(entry.genres, vec!["Drama".to_string()]);
	}
}
