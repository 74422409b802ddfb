// ---------------------------------------------------------------------------
// Count vectorizer — bag-of-words over soup strings
// ---------------------------------------------------------------------------
//
// Plain term counts with a fixed English stop-word list and no inverse
// document-frequency weighting. The design favors exact tag/crew/genre
// overlap over term rarity, so a shared cast member counts the same in a
// common genre as in a rare one.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;

/// Sparse term-count vector: (term id, count) pairs sorted by term id.
pub type CountVector = Vec<(usize, u32)>;

// ---------------------------------------------------------------------------
// Stop words
// ---------------------------------------------------------------------------

fn english_stop_words() -> HashSet<&'static str> {
	[
		"a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
		"are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
		"both", "but", "by", "could", "did", "do", "does", "doing", "down", "during", "each",
		"few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
		"hers", "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it",
		"its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
		"now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
		"out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
		"the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
		"this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
		"were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
		"with", "you", "your", "yours", "yourself", "yourselves",
	]
	.into_iter()
	.collect()
}

// ---------------------------------------------------------------------------
// CountVectorizer
// ---------------------------------------------------------------------------

/// Document-term count vectorizer with a fixed vocabulary learned from the
/// corpus it is fit on. Tokens shorter than two characters are ignored.
pub struct CountVectorizer {
	token_re: Regex,
	stop_words: HashSet<&'static str>,
}

impl Default for CountVectorizer {
	fn default() -> Self {
		Self::new()
	}
}

impl CountVectorizer {
	pub fn new() -> Self {
		// Unwrap is fine: the pattern is a compile-time constant.
		let token_re = Regex::new(r"\b\w\w+\b").expect("valid token pattern");
		Self {
			token_re,
			stop_words: english_stop_words(),
		}
	}

	fn tokenize<'a>(&self, doc: &'a str) -> Vec<&'a str> {
		self.token_re
			.find_iter(doc)
			.map(|m| m.as_str())
			.filter(|t| !self.stop_words.contains(t.to_lowercase().as_str()))
			.collect()
	}

	/// Learn the vocabulary over `docs` and return one count vector per
	/// document. Term ids are assigned in sorted vocabulary order so the
	/// result is independent of hash iteration order.
	pub fn fit_transform(&self, docs: &[String]) -> (HashMap<String, usize>, Vec<CountVector>) {
		// First pass: collect the vocabulary (BTreeMap for deterministic ids).
		let mut vocabulary: BTreeMap<String, usize> = BTreeMap::new();
		for doc in docs {
			for token in self.tokenize(doc) {
				let lower = token.to_lowercase();
				let next_id = vocabulary.len();
				vocabulary.entry(lower).or_insert(next_id);
			}
		}
		// Reassign ids in sorted term order.
		for (id, (_, slot)) in vocabulary.iter_mut().enumerate() {
			*slot = id;
		}

		// Second pass: count terms per document.
		let mut vectors: Vec<CountVector> = Vec::with_capacity(docs.len());
		for doc in docs {
			let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
			for token in self.tokenize(doc) {
				if let Some(&id) = vocabulary.get(&token.to_lowercase()) {
					*counts.entry(id).or_insert(0) += 1;
				}
			}
			vectors.push(counts.into_iter().collect());
		}

		(vocabulary.into_iter().collect(), vectors)
	}
}

// ---------------------------------------------------------------------------
// Sparse vector math
// ---------------------------------------------------------------------------

/// L2 norm of a sparse count vector.
pub fn magnitude(v: &CountVector) -> f64 {
	v.iter()
		.map(|&(_, c)| {
			let c = c as f64;
			c * c
		})
		.sum::<f64>()
		.sqrt()
}

/// Cosine similarity between two sparse count vectors using pre-computed
/// magnitudes. Counts are non-negative, so the result is in [0, 1]; a zero
/// vector is similar to nothing (0.0).
pub fn cosine_with_magnitude(a: &CountVector, b: &CountVector, mag_a: f64, mag_b: f64) -> f64 {
	let denom = mag_a * mag_b;
	if denom == 0.0 {
		return 0.0;
	}

	// Merge walk over the two id-sorted vectors.
	let mut dot: f64 = 0.0;
	let (mut i, mut j) = (0usize, 0usize);
	while i < a.len() && j < b.len() {
		match a[i].0.cmp(&b[j].0) {
			std::cmp::Ordering::Less => i += 1,
			std::cmp::Ordering::Greater => j += 1,
			std::cmp::Ordering::Equal => {
				dot += a[i].1 as f64 * b[j].1 as f64;
				i += 1;
				j += 1;
			}
		}
	}

	let result = dot / denom;
	if !result.is_finite() {
		return 0.0;
	}
	result.clamp(0.0, 1.0)
}

/// Cosine similarity between two sparse count vectors.
pub fn cosine(a: &CountVector, b: &CountVector) -> f64 {
	cosine_with_magnitude(a, b, magnitude(a), magnitude(b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn docs(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn fit_transform_counts_terms() {
		let (vocab, vectors) = CountVectorizer::new()
			.fit_transform(&docs(&["action hero action", "hero drama"]));
		assert_eq!(vocab.len(), 3);

		let action = vocab["action"];
		let hero = vocab["hero"];
		let drama = vocab["drama"];

		assert!(vectors[0].contains(&(action, 2)));
		assert!(vectors[0].contains(&(hero, 1)));
		assert!(vectors[1].contains(&(hero, 1)));
		assert!(vectors[1].contains(&(drama, 1)));
	}

	#[test]
	fn stop_words_are_removed() {
		let (vocab, vectors) = CountVectorizer::new()
			.fit_transform(&docs(&["the quick fox and the dog"]));
		assert!(!vocab.contains_key("the"));
		assert!(!vocab.contains_key("and"));
		assert!(vocab.contains_key("quick"));
		assert_eq!(vectors[0].len(), 3);
	}

	#[test]
	fn single_character_tokens_ignored() {
		let (vocab, _) = CountVectorizer::new().fit_transform(&docs(&["x yz"]));
		assert!(!vocab.contains_key("x"));
		assert!(vocab.contains_key("yz"));
	}

	#[test]
	fn empty_document_yields_empty_vector() {
		let (_, vectors) = CountVectorizer::new().fit_transform(&docs(&["", "drama"]));
		assert!(vectors[0].is_empty());
		assert_eq!(vectors[1].len(), 1);
	}

	#[test]
	fn term_ids_are_deterministic() {
		let corpus = docs(&["zebra apple", "apple mango"]);
		let (vocab_a, vectors_a) = CountVectorizer::new().fit_transform(&corpus);
		let (vocab_b, vectors_b) = CountVectorizer::new().fit_transform(&corpus);
		assert_eq!(vocab_a, vocab_b);
		assert_eq!(vectors_a, vectors_b);
		// Sorted term order: apple < mango < zebra.
		assert_eq!(vocab_a["apple"], 0);
		assert_eq!(vocab_a["mango"], 1);
		assert_eq!(vocab_a["zebra"], 2);
	}

	#[test]
	fn cosine_identical_vectors() {
		let v: CountVector = vec![(0, 1), (2, 3)];
		assert!((cosine(&v, &v) - 1.0).abs() < 1e-10);
	}

	#[test]
	fn cosine_disjoint_vectors() {
		let a: CountVector = vec![(0, 2)];
		let b: CountVector = vec![(1, 5)];
		assert_eq!(cosine(&a, &b), 0.0);
	}

	#[test]
	fn cosine_zero_vector() {
		let a: CountVector = Vec::new();
		let b: CountVector = vec![(0, 1)];
		assert_eq!(cosine(&a, &b), 0.0);
		assert_eq!(cosine(&a, &a), 0.0);
	}

	#[test]
	fn cosine_partial_overlap_between_zero_and_one() {
		let a: CountVector = vec![(0, 1), (1, 1)];
		let b: CountVector = vec![(1, 1), (2, 1)];
		let sim = cosine(&a, &b);
		assert!(sim > 0.0 && sim < 1.0);
		assert!((sim - 0.5).abs() < 1e-10);
	}

	#[test]
	fn magnitude_basic() {
		let v: CountVector = vec![(0, 3), (5, 4)];
		assert!((magnitude(&v) - 5.0).abs() < 1e-10);
	}
}
