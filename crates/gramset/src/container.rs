//! Payload association on top of the matching engine
//!
//! The engine only ever sees strings. Records are reduced to their
//! identifying string before indexing and kept in a table keyed by the
//! normalized form, so a match can be resolved back to its record.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use gramset_core::{normalize, FuzzyMatch, FuzzySet, GramConfig};

use crate::error::{Error, Result};

/// Key name used when the configuration does not name one.
pub const DEFAULT_PAYLOAD_KEY: &str = "key";

/// Extracts the identifying string of a record for a given key name.
pub trait SearchKey {
    /// The value stored under `key`, if present.
    fn search_key(&self, key: &str) -> Option<String>;
}

impl SearchKey for Value {
    fn search_key(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl SearchKey for HashMap<String, String> {
    fn search_key(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl SearchKey for BTreeMap<String, String> {
    fn search_key(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Something that can be added to a container
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// Indexed as-is, no payload
    Plain(String),
    /// Indexed by its extracted key, payload retained
    Record(T),
}

impl<T> From<&str> for Entry<T> {
    fn from(s: &str) -> Self {
        Entry::Plain(s.to_string())
    }
}

impl<T> From<String> for Entry<T> {
    fn from(s: String) -> Self {
        Entry::Plain(s)
    }
}

/// A match resolved through the payload table
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a, T> {
    /// The record stored under the matched key
    Record(&'a T),
    /// No record for the key; the canonical original string
    Text(String),
}

impl<'a, T> Resolved<'a, T> {
    pub fn record(&self) -> Option<&'a T> {
        match *self {
            Resolved::Record(record) => Some(record),
            Resolved::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Resolved::Record(_) => None,
            Resolved::Text(text) => Some(text.as_str()),
        }
    }
}

/// Container configuration: engine settings plus the payload key name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    #[serde(flatten)]
    pub gram: GramConfig,
    /// Field holding a record's identifying string
    pub payload_key: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            gram: GramConfig::default(),
            payload_key: DEFAULT_PAYLOAD_KEY.to_string(),
        }
    }
}

impl ContainerConfig {
    pub fn with_payload_key(key: impl Into<String>) -> Self {
        Self {
            payload_key: key.into(),
            ..Self::default()
        }
    }
}

type Extractor<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Fuzzy set whose entries may carry payload records.
///
/// Records are stored under the normalized form of their key. When two
/// records share a normalized key the later one replaces the earlier, the
/// same last-write-wins rule the engine applies to original strings.
pub struct FuzzySetContainer<T> {
    set: FuzzySet,
    records: AHashMap<String, T>,
    payload_key: String,
    extractor: Extractor<T>,
}

impl<T: SearchKey + 'static> FuzzySetContainer<T> {
    /// Create an empty container extracting keys via [`SearchKey`].
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let key = config.payload_key.clone();
        Self::with_extractor(config, move |record: &T| record.search_key(&key))
    }

    /// Create a container and add `entries` in order.
    ///
    /// Fails on the first record without a usable key.
    pub fn from_entries<I, E>(config: ContainerConfig, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entry<T>>,
        T: fmt::Debug,
    {
        let mut container = Self::new(config)?;
        for entry in entries {
            container.add(entry)?;
        }
        Ok(container)
    }
}

impl<T> FuzzySetContainer<T> {
    /// Create an empty container with a custom key extractor.
    ///
    /// `payload_key` from the config is only used in error messages.
    pub fn with_extractor<F>(config: ContainerConfig, extractor: F) -> Result<Self>
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        let set = FuzzySet::with_config(config.gram)?;
        Ok(Self {
            set,
            records: AHashMap::new(),
            payload_key: config.payload_key,
            extractor: Box::new(extractor),
        })
    }

    /// Add a plain string or a record.
    ///
    /// Returns `true` if the (extracted) string was newly indexed.
    pub fn add(&mut self, entry: impl Into<Entry<T>>) -> Result<bool>
    where
        T: fmt::Debug,
    {
        match entry.into() {
            Entry::Plain(s) => Ok(self.set.add(&s)),
            Entry::Record(record) => {
                let value = (self.extractor)(&record)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| {
                        warn!(key = %self.payload_key, "rejected record without search key");
                        Error::MissingKey {
                            key: self.payload_key.clone(),
                            record: format!("{record:?}"),
                        }
                    })?;

                let added = self.set.add(&value);
                let key = normalize(&value);
                if self.records.insert(key.clone(), record).is_some() {
                    debug!(key = %key, "replaced record");
                }
                Ok(added)
            }
        }
    }

    /// Ranked matches resolved to records where one is stored.
    pub fn get_all(&self, query: &str, min_score: f64) -> Vec<(f64, Resolved<'_, T>)> {
        self.set
            .search(query, min_score)
            .into_iter()
            .map(|m| (m.score, self.resolve(m)))
            .collect()
    }

    /// Best match resolved to its record where one is stored.
    pub fn get_first(&self, query: &str, min_score: f64) -> Option<(f64, Resolved<'_, T>)> {
        self.set
            .best_match(query, min_score)
            .map(|m| (m.score, self.resolve(m)))
    }

    /// Ranked engine matches without record substitution.
    pub fn get_all_raw(&self, query: &str, min_score: f64) -> Vec<FuzzyMatch> {
        self.set.search(query, min_score)
    }

    pub fn get_first_raw(&self, query: &str, min_score: f64) -> Option<FuzzyMatch> {
        self.set.best_match(query, min_score)
    }

    fn resolve(&self, m: FuzzyMatch) -> Resolved<'_, T> {
        match self.records.get(&m.key) {
            Some(record) => Resolved::Record(record),
            None => Resolved::Text(m.value),
        }
    }

    /// Every indexed entry in insertion order, records substituted.
    pub fn values(&self) -> Vec<Resolved<'_, T>> {
        self.set
            .entries()
            .map(|(key, value)| match self.records.get(key) {
                Some(record) => Resolved::Record(record),
                None => Resolved::Text(value.to_string()),
            })
            .collect()
    }

    /// Record stored for the normalized form of `s`
    pub fn record(&self, s: &str) -> Option<&T> {
        self.records.get(&normalize(s))
    }

    /// The payload table, keyed by normalized string
    pub fn records(&self) -> &AHashMap<String, T> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn payload_key(&self) -> &str {
        &self.payload_key
    }

    /// Underlying engine
    pub fn set(&self) -> &FuzzySet {
        &self.set
    }
}

impl<T: fmt::Debug> fmt::Debug for FuzzySetContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzySetContainer")
            .field("set", &self.set)
            .field("records", &self.records)
            .field("payload_key", &self.payload_key)
            .finish_non_exhaustive()
    }
}
