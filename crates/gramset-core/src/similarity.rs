use strsim::levenshtein;

use crate::grams::GramVector;

/// Cosine similarity from a dot product and the two squared magnitudes.
///
/// Returns 0.0 if either magnitude is zero.
#[inline]
pub fn cosine(dot: u64, squared_norm_a: u64, squared_norm_b: u64) -> f64 {
    let denom = squared_norm_a as f64 * squared_norm_b as f64;
    if denom == 0.0 {
        return 0.0;
    }
    (dot as f64 / denom.sqrt()).min(1.0)
}

/// Cosine similarity between two gram count vectors.
///
/// The dot product only visits the query's grams.
pub fn cosine_similarity(query: &GramVector, candidate: &GramVector) -> f64 {
    let dot: u64 = query
        .iter()
        .map(|(gram, count)| u64::from(count) * u64::from(candidate.count(gram)))
        .sum();

    cosine(dot, query.squared_norm(), candidate.squared_norm())
}

/// Edit-distance similarity: `1 - distance / longest`, measured in chars.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}
