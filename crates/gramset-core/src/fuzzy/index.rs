//! GramIndex - inverted index for a single gram size

use ahash::AHashMap;

use crate::grams::{gram_counts, GramVector};
use crate::similarity::cosine;

/// One occurrence record: entry `entry` contains the gram `count` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub entry: usize,
    pub count: u32,
}

/// Inverted index over the grams of one size.
///
/// Entries are identified by insertion position. The owning set inserts
/// every key into each of its indices, so ids agree across sizes.
#[derive(Debug, Clone)]
pub struct GramIndex {
    size: usize,
    postings: AHashMap<String, Vec<Posting>>,
    // Indexed by entry id
    squared_norms: Vec<u64>,
}

impl GramIndex {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            postings: AHashMap::new(),
            squared_norms: Vec::new(),
        }
    }

    /// Gram size of this index
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.squared_norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squared_norms.is_empty()
    }

    /// Number of distinct grams seen so far
    pub fn gram_count(&self) -> usize {
        self.postings.len()
    }

    /// Register the normalized string `key` and return its entry id.
    pub fn insert(&mut self, key: &str) -> usize {
        let entry = self.squared_norms.len();
        let vector = gram_counts(key, self.size);
        for (gram, count) in vector.iter() {
            self.postings
                .entry(gram.to_string())
                .or_default()
                .push(Posting { entry, count });
        }
        self.squared_norms.push(vector.squared_norm());
        entry
    }

    /// Postings for `gram`, empty if never seen.
    pub fn postings(&self, gram: &str) -> &[Posting] {
        self.postings.get(gram).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Score every entry sharing at least one gram with `query`.
    ///
    /// Dot products are accumulated from the postings of the query's grams, so
    /// only shared grams ever contribute. Output order is unspecified.
    pub fn score_candidates(&self, query: &GramVector) -> Vec<(usize, f64)> {
        let mut dots: AHashMap<usize, u64> = AHashMap::new();
        for (gram, query_count) in query.iter() {
            for posting in self.postings(gram) {
                *dots.entry(posting.entry).or_insert(0) +=
                    u64::from(query_count) * u64::from(posting.count);
            }
        }

        dots.into_iter()
            .map(|(entry, dot)| {
                let score = cosine(dot, query.squared_norm(), self.squared_norms[entry]);
                (entry, score)
            })
            .collect()
    }
}
