//! Lexical product retrieval.
//!
//! The query is split on whitespace and lower-cased; tokens shorter than [`MIN_TOKEN_CHARS`]
//! characters are dropped (articles and prepositions such as "un", "de", "la") and repeats are
//! collapsed. A product scores one point per distinct token found as a plain substring of its
//! lower-cased description or lower-cased family path. There is no stemming, accent folding or
//! fuzzy matching: "cables" does not match "cable", "teclado" does not match "tecládo". Only
//! products with a positive score are returned, best first, listing order among equal scores,
//! at most [`MAX_RESULTS`]. These are the only products the assistant is shown for a message.

use crate::types::{Product, ScoredProduct};

/// Upper bound on products returned by [`search`].
pub const MAX_RESULTS: usize = 5;

/// Minimum token length in characters; shorter tokens are ignored.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Distinct lower-cased query tokens of at least [`MIN_TOKEN_CHARS`] characters, in query order.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        let token = word.to_lowercase();
        if token.chars().count() < MIN_TOKEN_CHARS || tokens.contains(&token) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}

/// Number of `tokens` contained in the product's description or family path.
pub fn score(product: &Product, tokens: &[String]) -> usize {
    let description = product.description.to_lowercase();
    let family = product.family.to_lowercase();
    tokens
        .iter()
        .filter(|t| description.contains(t.as_str()) || family.contains(t.as_str()))
        .count()
}

/// Ranks `listing` against `query`. An empty token set retrieves nothing.
pub fn search(query: &str, listing: &[Product]) -> Vec<ScoredProduct> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut hits: Vec<ScoredProduct> = listing
        .iter()
        .filter_map(|product| {
            let score = score(product, &tokens);
            (score > 0).then(|| ScoredProduct {
                product: product.clone(),
                score,
            })
        })
        .collect();
    // sort_by is stable: equal scores keep listing order.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_RESULTS);
    hits
}
