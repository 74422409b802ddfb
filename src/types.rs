// ---------------------------------------------------------------------------
// Core data model — movies, ratings, neighbors, recommendation output
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// FieldValue — shape-checked metadata field
// ---------------------------------------------------------------------------

/// A raw metadata field, shape-checked once at ingestion time.
///
/// A field is either present as a list (pipe-delimited in the source data),
/// present as a single scalar, or absent. Consumers never re-probe the shape;
/// `items` flattens all three cases into a token list (empty for `Absent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
	List(Vec<String>),
	Scalar(String),
	Absent,
}

impl FieldValue {
	/// Parse a raw field using `delimiter` to split multi-valued input.
	///
	/// Empty or missing input yields `Absent`. Input without the delimiter
	/// is a `Scalar`; the encoder later treats it as a singleton list, so a
	/// lone cast name and a one-element pipe list behave identically.
	pub fn from_delimited(raw: Option<&str>, delimiter: char) -> Self {
		let raw = match raw {
			Some(r) => r.trim(),
			None => return FieldValue::Absent,
		};
		if raw.is_empty() {
			return FieldValue::Absent;
		}
		if raw.contains(delimiter) {
			let items: Vec<String> = raw
				.split(delimiter)
				.map(|s| s.trim().to_string())
				.filter(|s| !s.is_empty())
				.collect();
			if items.is_empty() {
				FieldValue::Absent
			} else {
				FieldValue::List(items)
			}
		} else {
			FieldValue::Scalar(raw.to_string())
		}
	}

	/// All values carried by the field, scalar included, in source order.
	pub fn items(&self) -> Vec<String> {
		match self {
			FieldValue::List(items) => items.clone(),
			FieldValue::Scalar(s) => vec![s.clone()],
			FieldValue::Absent => Vec::new(),
		}
	}

	pub fn is_absent(&self) -> bool {
		matches!(self, FieldValue::Absent)
	}

	/// Display form: items joined with ", ", or `None` when absent.
	pub fn display(&self) -> Option<String> {
		match self {
			FieldValue::Absent => None,
			_ => Some(self.items().join(", ")),
		}
	}
}

// ---------------------------------------------------------------------------
// Movie / Rating / Link
// ---------------------------------------------------------------------------

/// One catalog row. `id` and `title` are both unique lookup keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
	pub id: u32,
	pub title: String,
	pub year: Option<i32>,
	pub director: FieldValue,
	pub cast: FieldValue,
	pub keywords: FieldValue,
	pub genres: FieldValue,
	pub tagline: Option<String>,
}

/// One rating event. `movie_id` refers to a catalog id; ratings arriving
/// under a foreign id scheme go through the crosswalk join first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
	pub user_id: u32,
	pub movie_id: u32,
	pub rating: f64,
}

/// Crosswalk row mapping a rating-side movie id to a catalog id.
/// Precondition data, supplied alongside the rating table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
	pub rating_movie_id: u32,
	pub catalog_id: u32,
}

// ---------------------------------------------------------------------------
// Neighbors and recommendation output
// ---------------------------------------------------------------------------

/// A scored neighbor of a query movie. Never the query movie itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
	pub movie_id: u32,
	pub score: f64,
}

/// Display record for one recommended movie, joined back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
	pub title: String,
	pub year: Option<i32>,
	pub director: Option<String>,
	pub genres: Vec<String>,
	pub tagline: Option<String>,
}

/// One labeled block of recommendations. The content and collaborative
/// strategies produce a single group; hybrid produces two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
	pub label: String,
	pub entries: Vec<MovieSummary>,
}

/// Ordered recommendation output. An empty result is the explicit
/// "no recommendations available" signal; it is never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
	pub groups: Vec<RecommendationGroup>,
}

impl RecommendationResult {
	pub fn is_empty(&self) -> bool {
		self.groups.iter().all(|g| g.entries.is_empty())
	}

	/// Total number of entries across all groups.
	pub fn len(&self) -> usize {
		self.groups.iter().map(|g| g.entries.len()).sum()
	}
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
	Content,
	Collaborative,
	Hybrid,
}

impl FromStr for Strategy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"content" => Ok(Strategy::Content),
			"collaborative" | "collab" => Ok(Strategy::Collaborative),
			"hybrid" => Ok(Strategy::Hybrid),
			other => Err(format!(
				"unknown strategy '{other}' (expected content, collaborative, or hybrid)"
			)),
		}
	}
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Strategy::Content => "content",
			Strategy::Collaborative => "collaborative",
			Strategy::Hybrid => "hybrid",
		};
		f.write_str(name)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
