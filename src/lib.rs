// ---------------------------------------------------------------------------
// reelmate — movie recommendation engine
// ---------------------------------------------------------------------------
//
// Recommends movies by three strategies: content similarity (bag-of-words
// cosine over metadata soups), collaborative filtering (rating-pattern
// similarity between items), and a hybrid concatenation of both lists.
//
// Typical flow:
//
//   let movies = ingest::load_movies("movies.csv")?;
//   let ratings = ingest::crosswalk(
//       ingest::load_ratings("ratings.csv")?,
//       &ingest::load_links("links.csv")?,
//   );
//   let mut catalog = Catalog::from_movies(movies);
//   catalog.set_ratings(ratings);
//   let mut recommender = Recommender::new(catalog);
//   recommender.build()?;
//   let result = recommender.recommend("Toy Story", 5, Strategy::Hybrid)?;
// ---------------------------------------------------------------------------

pub mod catalog;
pub mod collab;
pub mod content;
pub mod error;
pub mod ingest;
pub mod recommend;
pub mod soup;
pub mod types;
pub mod vectorizer;

pub use catalog::Catalog;
pub use collab::{
	CosineModel, CosineModelConfig, ItemSimilarity, PearsonCorrelation, RatingMatrix,
};
pub use content::ContentIndex;
pub use error::EngineError;
pub use recommend::Recommender;
pub use types::{
	FieldValue, Link, Movie, MovieSummary, Neighbor, Rating, RecommendationGroup,
	RecommendationResult, Strategy,
};
