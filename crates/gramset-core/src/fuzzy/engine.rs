//! FuzzySet - Core fuzzy matching implementation

use std::cmp::Ordering;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::index::GramIndex;
use crate::config::GramConfig;
use crate::error::Result;
use crate::grams::gram_counts;
use crate::normalize::normalize;
use crate::similarity::levenshtein_similarity;

/// Threshold used when the caller has no opinion.
pub const DEFAULT_MIN_SCORE: f64 = 0.33;

/// A ranked match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// Similarity in `[0, 1]`
    pub score: f64,
    /// Canonical original form of the matched string
    pub value: String,
    /// Normalized form, the lookup key for payload tables
    pub key: String,
}

/// One distinct normalized string and every original form inserted for it.
#[derive(Debug, Clone)]
struct StoredEntry {
    key: String,
    key_chars: usize,
    originals: Vec<String>,
}

impl StoredEntry {
    fn new(key: String, original: String) -> Self {
        Self {
            key_chars: key.chars().count(),
            key,
            originals: vec![original],
        }
    }

    /// Most recently inserted original (last write wins).
    fn canonical(&self) -> &str {
        self.originals.last().map(String::as_str).unwrap_or(&self.key)
    }
}

/// Score descending, then shorter key, then key text.
fn rank_order(a: (f64, &StoredEntry), b: (f64, &StoredEntry)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.key_chars.cmp(&b.1.key_chars))
        .then_with(|| a.1.key.cmp(&b.1.key))
}

/// Grow-only fuzzy string set backed by one inverted index per gram size.
///
/// Not internally synchronized: `add` takes `&mut self`, so share it behind a
/// lock when writers and readers overlap.
#[derive(Debug, Clone)]
pub struct FuzzySet {
    config: GramConfig,
    // Ascending by gram size
    indices: Vec<GramIndex>,
    entries: Vec<StoredEntry>,
    lookup: AHashMap<String, usize>,
}

impl Default for FuzzySet {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzySet {
    /// Create an empty set with the default 2..=3 gram sizes
    pub fn new() -> Self {
        Self::build(GramConfig::default())
    }

    /// Create an empty set with custom configuration
    pub fn with_config(config: GramConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a set and insert `initial` in order.
    pub fn from_strings<I, S>(config: GramConfig, initial: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::with_config(config)?;
        for s in initial {
            set.add(s.as_ref());
        }
        Ok(set)
    }

    fn build(config: GramConfig) -> Self {
        let indices = (config.gram_size_lower..=config.gram_size_upper)
            .map(GramIndex::new)
            .collect();
        Self {
            config,
            indices,
            entries: Vec::new(),
            lookup: AHashMap::new(),
        }
    }

    /// Insert a string.
    ///
    /// Returns `true` if its normalized form was new. A repeat is recorded as
    /// another variant (and becomes the canonical original) without touching
    /// the gram indices.
    pub fn add(&mut self, original: &str) -> bool {
        let key = normalize(original);

        if let Some(&id) = self.lookup.get(&key) {
            self.entries[id].originals.push(original.to_string());
            trace!(key = %key, variants = self.entries[id].originals.len(), "recorded variant");
            return false;
        }

        let id = self.entries.len();
        for index in &mut self.indices {
            index.insert(&key);
        }
        trace!(key = %key, id, "indexed new entry");

        self.lookup.insert(key.clone(), id);
        self.entries.push(StoredEntry::new(key, original.to_string()));
        true
    }

    /// Ranked matches scoring at least `min_score`; empty when nothing clears it.
    pub fn search(&self, query: &str, min_score: f64) -> Vec<FuzzyMatch> {
        self.rank(query, min_score)
            .into_iter()
            .map(|(score, id)| {
                let entry = &self.entries[id];
                FuzzyMatch {
                    score,
                    value: entry.canonical().to_string(),
                    key: entry.key.clone(),
                }
            })
            .collect()
    }

    /// Like [`search`](Self::search), but returns `default` when nothing matches.
    pub fn search_or(
        &self,
        query: &str,
        min_score: f64,
        default: Vec<FuzzyMatch>,
    ) -> Vec<FuzzyMatch> {
        let matches = self.search(query, min_score);
        if matches.is_empty() {
            default
        } else {
            matches
        }
    }

    /// Top-ranked match, if any clears `min_score`.
    pub fn best_match(&self, query: &str, min_score: f64) -> Option<FuzzyMatch> {
        self.search(query, min_score).into_iter().next()
    }

    /// Ranked `(score, normalized key)` pairs.
    pub fn search_keys(&self, query: &str, min_score: f64) -> Vec<(f64, String)> {
        self.rank(query, min_score)
            .into_iter()
            .map(|(score, id)| (score, self.entries[id].key.clone()))
            .collect()
    }

    /// Ranked matches expanded to every stored original, newest variant first.
    pub fn search_variants(&self, query: &str, min_score: f64) -> Vec<FuzzyMatch> {
        self.rank(query, min_score)
            .into_iter()
            .flat_map(|(score, id)| {
                let entry = &self.entries[id];
                entry.originals.iter().rev().map(move |original| FuzzyMatch {
                    score,
                    value: original.clone(),
                    key: entry.key.clone(),
                })
            })
            .collect()
    }

    /// Probe gram sizes from largest to smallest. The first size with at least
    /// one candidate clearing `min_score` decides the result; smaller (fuzzier)
    /// sizes are only consulted when a larger one yields nothing above the
    /// threshold. Because the winning size depends on `min_score`, a higher
    /// threshold can fall through to a smaller size and return more matches.
    fn rank(&self, query: &str, min_score: f64) -> Vec<(f64, usize)> {
        let query = normalize(query);
        if query.is_empty() || self.entries.is_empty() {
            return Vec::new();
        }

        for index in self.indices.iter().rev() {
            let query_vector = gram_counts(&query, index.size());
            let mut scored = index.score_candidates(&query_vector);
            let candidates = scored.len();

            if self.config.use_levenshtein {
                self.refine(&query, &mut scored);
            }

            scored.retain(|&(_, score)| score >= min_score);
            if scored.is_empty() {
                trace!(
                    query = %query,
                    gram_size = index.size(),
                    candidates,
                    "nothing above threshold, falling back"
                );
                continue;
            }

            scored.sort_by(|&(id_a, a), &(id_b, b)| {
                rank_order((a, &self.entries[id_a]), (b, &self.entries[id_b]))
            });
            debug!(
                query = %query,
                gram_size = index.size(),
                candidates,
                matches = scored.len(),
                min_score,
                "search resolved"
            );
            return scored.into_iter().map(|(id, score)| (score, id)).collect();
        }

        debug!(query = %query, min_score, "no match at any gram size");
        Vec::new()
    }

    /// Keep the best cosine candidates and rescore them by edit distance.
    fn refine(&self, query: &str, scored: &mut Vec<(usize, f64)>) {
        scored.sort_by(|&(id_a, a), &(id_b, b)| {
            rank_order((a, &self.entries[id_a]), (b, &self.entries[id_b]))
        });
        scored.truncate(self.config.levenshtein_candidates);
        for (id, score) in scored.iter_mut() {
            *score = levenshtein_similarity(query, &self.entries[*id].key);
        }
    }

    /// Number of distinct normalized strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical originals in insertion order
    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(StoredEntry::canonical).collect()
    }

    /// `(normalized key, canonical original)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.canonical()))
    }

    /// Whether `s` normalizes to an indexed string
    pub fn contains(&self, s: &str) -> bool {
        self.lookup.contains_key(&normalize(s))
    }

    /// Every original inserted under the normalized form of `s`, oldest first.
    pub fn variants(&self, s: &str) -> Option<&[String]> {
        self.lookup
            .get(&normalize(s))
            .map(|&id| self.entries[id].originals.as_slice())
    }

    pub fn config(&self) -> &GramConfig {
        &self.config
    }

    /// Per-size indices, smallest gram size first
    pub fn indices(&self) -> &[GramIndex] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GramError;
    use pretty_assertions::assert_eq;

    fn fruit_set() -> FuzzySet {
        FuzzySet::from_strings(
            GramConfig::default(),
            ["Banana", "Blueberry", "Raspberry", "Cherry", "Apple"],
        )
        .unwrap()
    }

    #[test]
    fn test_typo_finds_apple() {
        let set = fruit_set();
        let matches = set.search("Aple", DEFAULT_MIN_SCORE);
        assert!(!matches.is_empty());
        assert_eq!(matches[0].value, "Apple");
        assert_eq!(matches[0].key, "apple");
    }

    #[test]
    fn test_no_match_is_empty() {
        let set = fruit_set();
        assert!(set.search("zzz", 0.9).is_empty());
        assert!(set.best_match("zzz", 0.9).is_none());
    }

    #[test]
    fn test_search_or_returns_default() {
        let set = fruit_set();
        let fallback = vec![FuzzyMatch {
            score: 0.0,
            value: "none".into(),
            key: "none".into(),
        }];
        assert_eq!(set.search_or("zzz", 0.9, fallback.clone()), fallback);
        assert_eq!(set.search_or("apple", 0.9, fallback)[0].value, "Apple");
    }

    #[test]
    fn test_add_grows_set() {
        let mut set = fruit_set();
        assert_eq!(set.len(), 5);
        assert!(set.add("Dragonfruit"));
        assert_eq!(set.len(), 6);
        let best = set.best_match("Dragon", DEFAULT_MIN_SCORE).unwrap();
        assert_eq!(best.value, "Dragonfruit");
    }

    #[test]
    fn test_exact_match_scores_one() {
        let set = fruit_set();
        let best = set.best_match("raspberry", 1.0).unwrap();
        assert_eq!(best.value, "Raspberry");
        assert_eq!(best.score, 1.0);
    }

    #[test]
    fn test_values_in_insertion_order() {
        let set = fruit_set();
        assert_eq!(
            set.values(),
            vec!["Banana", "Blueberry", "Raspberry", "Cherry", "Apple"]
        );
    }

    #[test]
    fn test_repeated_key_records_variant() {
        let mut set = FuzzySet::new();
        assert!(set.add("Apple"));
        assert!(!set.add("  APPLE "));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.variants("apple").unwrap(),
            &["Apple".to_string(), "  APPLE ".to_string()]
        );

        // Last write wins for the canonical original
        assert_eq!(set.values(), vec!["  APPLE "]);
        assert_eq!(set.best_match("apple", 0.5).unwrap().value, "  APPLE ");

        let all: Vec<String> = set
            .search_variants("apple", 0.5)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(all, vec!["  APPLE ".to_string(), "Apple".to_string()]);

        for index in set.indices() {
            assert_eq!(index.len(), 1);
        }
    }

    #[test]
    fn test_empty_query() {
        let set = fruit_set();
        assert!(set.search("", 0.0).is_empty());
        assert!(set.search("   ", 0.0).is_empty());
    }

    #[test]
    fn test_empty_string_never_matches() {
        let mut set = FuzzySet::new();
        assert!(set.add(""));
        assert_eq!(set.len(), 1);
        assert!(set.search("a", 0.0).is_empty());
    }

    #[test]
    fn test_empty_set() {
        let set = FuzzySet::new();
        assert!(set.is_empty());
        assert!(set.search("anything", 0.0).is_empty());
    }

    #[test]
    fn test_largest_gram_size_wins_when_above_threshold() {
        let set = FuzzySet::from_strings(GramConfig::default(), ["ab"]).unwrap();

        // Trigrams share "--a" and "-ab": 2 / sqrt(5 * 4)
        let matches = set.search("abx", 0.4);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 2.0 / 20f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_weak_trigram_matches_fall_back_to_bigrams() {
        let set = FuzzySet::from_strings(GramConfig::default(), ["ab"]).unwrap();

        // Trigram score 0.447 misses 0.5; bigrams share "-a" and "ab": 2 / sqrt(4 * 3)
        let matches = set.search("abx", 0.5);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "ab");
        assert!((matches[0].score - 2.0 / 12f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_higher_threshold_can_select_smaller_grams() {
        let set = fruit_set();

        let trigram: Vec<String> = set.search("bery", 0.49).into_iter().map(|m| m.value).collect();
        assert_eq!(trigram, vec!["Blueberry".to_string()]);

        let bigram: Vec<String> = set.search("bery", 0.5).into_iter().map(|m| m.value).collect();
        assert_eq!(
            bigram,
            vec![
                "Blueberry".to_string(),
                "Raspberry".to_string(),
                "Cherry".to_string()
            ]
        );
    }

    #[test]
    fn test_levenshtein_pool_below_threshold_falls_back() {
        let config = GramConfig {
            use_levenshtein: true,
            levenshtein_candidates: 1,
            ..GramConfig::default()
        };
        let set = FuzzySet::from_strings(config, ["aa", "aaba"]).unwrap();

        // Trigram pool keeps only "aa" (edit score 1/3); the bigram pool keeps
        // "aaba", two edits over four chars
        let matches = set.search("abb", 0.5);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "aaba");
        assert_eq!(matches[0].score, 0.5);
    }

    #[test]
    fn test_entries_pair_keys_with_canonical() {
        let mut set = FuzzySet::new();
        set.add("Apple");
        set.add(" Big  Cherry");
        set.add("APPLE");
        let entries: Vec<(&str, &str)> = set.entries().collect();
        assert_eq!(entries, vec![("apple", "APPLE"), ("big cherry", " Big  Cherry")]);
    }

    #[test]
    fn test_falls_back_to_smaller_grams() {
        let set = FuzzySet::from_strings(GramConfig::default(), ["ab"]).unwrap();

        // No shared trigram; bigrams share "ab": 1 / sqrt(5 * 3)
        let matches = set.search("cabd", 0.2);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 1.0 / 15f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_equal_scores_break_ties_by_key() {
        let set = FuzzySet::from_strings(GramConfig::default(), ["abce", "ABCD"]).unwrap();
        let keys: Vec<String> = set.search_keys("abc", 0.1).into_iter().map(|(_, k)| k).collect();
        assert_eq!(keys, vec!["abcd".to_string(), "abce".to_string()]);
    }

    #[test]
    fn test_rank_order_prefers_shorter_then_lexicographic() {
        let short = StoredEntry::new("ab".into(), "ab".into());
        let long = StoredEntry::new("aab".into(), "aab".into());
        let other = StoredEntry::new("ac".into(), "ac".into());

        assert_eq!(rank_order((0.5, &short), (0.5, &long)), Ordering::Less);
        assert_eq!(rank_order((0.5, &short), (0.5, &other)), Ordering::Less);
        assert_eq!(rank_order((0.4, &short), (0.5, &long)), Ordering::Greater);
    }

    #[test]
    fn test_levenshtein_refinement() {
        let config = GramConfig {
            use_levenshtein: true,
            ..GramConfig::default()
        };
        let set = FuzzySet::from_strings(config, ["Banana", "Apple"]).unwrap();
        let best = set.best_match("Aple", DEFAULT_MIN_SCORE).unwrap();
        assert_eq!(best.value, "Apple");
        assert!((best.score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_levenshtein_pool_truncates() {
        let config = GramConfig {
            use_levenshtein: true,
            levenshtein_candidates: 1,
            ..GramConfig::default()
        };
        let set = FuzzySet::from_strings(config, ["abcd", "abce", "abcf"]).unwrap();
        assert_eq!(set.search("abc", 0.0).len(), 1);
    }

    #[test]
    fn test_invalid_gram_range() {
        let err = FuzzySet::with_config(GramConfig::with_gram_sizes(3, 2)).unwrap_err();
        assert_eq!(err, GramError::InvalidGramRange { lower: 3, upper: 2 });
    }

    #[test]
    fn test_custom_gram_sizes() {
        let set = FuzzySet::from_strings(GramConfig::with_gram_sizes(2, 4), ["Blueberry"]).unwrap();
        let sizes: Vec<usize> = set.indices().iter().map(GramIndex::size).collect();
        assert_eq!(sizes, vec![2, 3, 4]);
        assert_eq!(set.best_match("blueberry", 1.0).unwrap().score, 1.0);
    }

    #[test]
    fn test_contains_uses_normalization() {
        let set = fruit_set();
        assert!(set.contains("  CHERRY"));
        assert!(!set.contains("cherr"));
        assert!(set.variants("durian").is_none());
    }

    #[test]
    fn test_caller_string_is_copied() {
        let mut set = FuzzySet::new();
        let mut s = String::from("Kiwi");
        set.add(&s);
        s.push_str("fruit");
        assert_eq!(set.values(), vec!["Kiwi"]);
    }
}
