//! Character n-gram generation
//!
//! Strings are padded with `size - 1` sentinel characters on both sides
//! before the window slides, so edge characters contribute their own grams
//! and even a one-character string yields `size` grams.

use ahash::AHashMap;

/// Boundary sentinel used for padding.
pub const PAD: char = '\u{1}';

/// Sliding-window grams of `s` (already normalized) with boundary padding.
///
/// Returns `len + size - 1` grams, or none for an empty string.
pub fn grams(s: &str, size: usize) -> Vec<String> {
    if s.is_empty() || size == 0 {
        return Vec::new();
    }

    let pad = size - 1;
    let mut padded: Vec<char> = Vec::with_capacity(s.len() + 2 * pad);
    padded.extend(std::iter::repeat(PAD).take(pad));
    padded.extend(s.chars());
    padded.extend(std::iter::repeat(PAD).take(pad));

    padded
        .windows(size)
        .map(|window| window.iter().collect())
        .collect()
}

/// Gram occurrence counts of one string at one gram size.
#[derive(Debug, Clone, Default)]
pub struct GramVector {
    counts: AHashMap<String, u32>,
    squared_norm: u64,
}

impl GramVector {
    /// Occurrences of `gram`, zero if absent.
    pub fn count(&self, gram: &str) -> u32 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Sum of squared counts. Kept integral so identical vectors score exactly 1.0.
    pub fn squared_norm(&self) -> u64 {
        self.squared_norm
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct grams with their counts, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(g, &c)| (g.as_str(), c))
    }
}

impl FromIterator<String> for GramVector {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut counts: AHashMap<String, u32> = AHashMap::new();
        for gram in iter {
            *counts.entry(gram).or_insert(0) += 1;
        }
        let squared_norm = counts.values().map(|&c| u64::from(c) * u64::from(c)).sum();
        Self {
            counts,
            squared_norm,
        }
    }
}

/// Count vector of `s` at `size`.
pub fn gram_counts(s: &str, size: usize) -> GramVector {
    grams(s, size).into_iter().collect()
}
