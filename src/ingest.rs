// ---------------------------------------------------------------------------
// Ingestion — tabular movie, rating, and crosswalk input
// ---------------------------------------------------------------------------
//
// Loads the catalog tables from CSV. Multi-valued metadata fields use the
// pipe delimiter and are shape-checked into `FieldValue` exactly once,
// here; downstream code never re-probes field shapes. Rows that cannot be
// parsed degrade to empty contributions (metadata) or are skipped
// (ratings), never a hard failure once the header checks pass.
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::EngineError;
use crate::types::{FieldValue, Link, Movie, Rating};

/// Delimiter for multi-valued metadata fields (cast, keywords, genres).
pub const FIELD_DELIMITER: char = '|';

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, EngineError> {
	headers
		.iter()
		.position(|h| h == name)
		.ok_or_else(|| EngineError::MissingColumn(name.to_string()))
}

fn field(record: &StringRecord, idx: usize) -> Option<&str> {
	record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Load the movie metadata table.
///
/// Required columns: id, original_title, release_year, cast, keywords,
/// genres, director, tagline. Extra columns are ignored. Rows without a
/// parseable id or a title are skipped; unparseable years become `None`.
pub fn load_movies<P: AsRef<Path>>(path: P) -> Result<Vec<Movie>, EngineError> {
	let mut reader = csv::Reader::from_path(path.as_ref())?;
	let headers = reader.headers()?.clone();

	let id_col = column_index(&headers, "id")?;
	let title_col = column_index(&headers, "original_title")?;
	let year_col = column_index(&headers, "release_year")?;
	let cast_col = column_index(&headers, "cast")?;
	let keywords_col = column_index(&headers, "keywords")?;
	let genres_col = column_index(&headers, "genres")?;
	let director_col = column_index(&headers, "director")?;
	let tagline_col = column_index(&headers, "tagline")?;

	let mut movies = Vec::new();
	let mut skipped = 0usize;
	for result in reader.records() {
		let record = result?;
		let id = match field(&record, id_col).and_then(|v| v.parse::<u32>().ok()) {
			Some(id) => id,
			None => {
				skipped += 1;
				continue;
			}
		};
		let title = match field(&record, title_col) {
			Some(t) => t.to_string(),
			None => {
				skipped += 1;
				continue;
			}
		};

		movies.push(Movie {
			id,
			title,
			year: field(&record, year_col).and_then(|v| v.parse::<i32>().ok()),
			director: FieldValue::from_delimited(field(&record, director_col), FIELD_DELIMITER),
			cast: FieldValue::from_delimited(field(&record, cast_col), FIELD_DELIMITER),
			keywords: FieldValue::from_delimited(field(&record, keywords_col), FIELD_DELIMITER),
			genres: FieldValue::from_delimited(field(&record, genres_col), FIELD_DELIMITER),
			tagline: field(&record, tagline_col).map(str::to_string),
		});
	}

	if skipped > 0 {
		tracing::debug!(skipped, "skipped movie rows without id or title");
	}
	tracing::debug!(movies = movies.len(), "movie table loaded");
	Ok(movies)
}

/// Load the rating table. Required columns: userId, movieId, rating.
/// Extra columns (timestamp) are ignored; unparseable rows are skipped.
pub fn load_ratings<P: AsRef<Path>>(path: P) -> Result<Vec<Rating>, EngineError> {
	let mut reader = csv::Reader::from_path(path.as_ref())?;
	let headers = reader.headers()?.clone();

	let user_col = column_index(&headers, "userId")?;
	let movie_col = column_index(&headers, "movieId")?;
	let rating_col = column_index(&headers, "rating")?;

	let mut ratings = Vec::new();
	let mut skipped = 0usize;
	for result in reader.records() {
		let record = result?;
		let parsed = (
			field(&record, user_col).and_then(|v| v.parse::<u32>().ok()),
			field(&record, movie_col).and_then(|v| v.parse::<u32>().ok()),
			field(&record, rating_col).and_then(|v| v.parse::<f64>().ok()),
		);
		match parsed {
			(Some(user_id), Some(movie_id), Some(rating)) => ratings.push(Rating {
				user_id,
				movie_id,
				rating,
			}),
			_ => skipped += 1,
		}
	}

	if skipped > 0 {
		tracing::debug!(skipped, "skipped malformed rating rows");
	}
	tracing::debug!(ratings = ratings.len(), "rating table loaded");
	Ok(ratings)
}

/// Load the id crosswalk. Required columns: movieId (rating-side id) and
/// tmdbId (catalog id). Rows with an empty or unparseable tmdbId are
/// skipped — those movies simply have no catalog counterpart.
pub fn load_links<P: AsRef<Path>>(path: P) -> Result<Vec<Link>, EngineError> {
	let mut reader = csv::Reader::from_path(path.as_ref())?;
	let headers = reader.headers()?.clone();

	let movie_col = column_index(&headers, "movieId")?;
	let tmdb_col = column_index(&headers, "tmdbId")?;

	let mut links = Vec::new();
	for result in reader.records() {
		let record = result?;
		let parsed = (
			field(&record, movie_col).and_then(|v| v.parse::<u32>().ok()),
			field(&record, tmdb_col).and_then(|v| v.parse::<u32>().ok()),
		);
		if let (Some(rating_movie_id), Some(catalog_id)) = parsed {
			links.push(Link {
				rating_movie_id,
				catalog_id,
			});
		}
	}

	tracing::debug!(links = links.len(), "crosswalk loaded");
	Ok(links)
}

/// Inner-join ratings against the crosswalk, remapping rating-side movie
/// ids to catalog ids. Ratings without a crosswalk entry are dropped.
pub fn crosswalk(ratings: Vec<Rating>, links: &[Link]) -> Vec<Rating> {
	let map: HashMap<u32, u32> = links
		.iter()
		.map(|l| (l.rating_movie_id, l.catalog_id))
		.collect();

	let before = ratings.len();
	let joined: Vec<Rating> = ratings
		.into_iter()
		.filter_map(|r| {
			map.get(&r.movie_id).map(|&catalog_id| Rating {
				user_id: r.user_id,
				movie_id: catalog_id,
				rating: r.rating,
			})
		})
		.collect();

	if joined.len() < before {
		tracing::debug!(
			dropped = before - joined.len(),
			"ratings without crosswalk entry dropped"
		);
	}
	joined
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
