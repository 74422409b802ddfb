// ---------------------------------------------------------------------------
// Feature Encoder — metadata soup construction
// ---------------------------------------------------------------------------
//
// Turns a movie's content metadata into a single normalized token string
// (the "soup") consumed by the bag-of-words vectorizer. Token cleaning
// strips internal whitespace so multi-word names count as one exact-match
// token ("Tom Hanks" -> "tomhanks").
// ---------------------------------------------------------------------------

use crate::types::{FieldValue, Movie};

/// Lowercase a raw value and strip all whitespace, preserving token
/// identity for exact-match counting.
pub fn clean_token(raw: &str) -> String {
	raw.chars()
		.filter(|c| !c.is_whitespace())
		.collect::<String>()
		.to_lowercase()
}

/// Cleaned tokens for one field; absent and empty fields contribute nothing.
fn field_tokens(field: &FieldValue) -> Vec<String> {
	field
		.items()
		.iter()
		.map(|item| clean_token(item))
		.filter(|t| !t.is_empty())
		.collect()
}

/// Build the soup string for a movie.
///
/// Field order is fixed: keywords, cast, director, genres. Order affects
/// token adjacency only; the bag-of-words counts are order-independent.
pub fn encode(movie: &Movie) -> String {
	let mut parts: Vec<String> = Vec::new();
	parts.extend(field_tokens(&movie.keywords));
	parts.extend(field_tokens(&movie.cast));
	parts.extend(field_tokens(&movie.director));
	parts.extend(field_tokens(&movie.genres));
	parts.join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
