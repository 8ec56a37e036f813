//! Outcome histogram.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Histogram mapping outcome bit-strings to shot counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `outcome`.
    pub fn record(&mut self, outcome: &str) {
        self.add(outcome, 1);
    }

    /// Record `n` occurrences of `outcome`.
    pub fn add(&mut self, outcome: &str, n: u64) {
        *self.0.entry(outcome.to_string()).or_insert(0) += n;
    }

    /// Count for `outcome`, zero if never seen.
    pub fn get(&self, outcome: &str) -> u64 {
        self.0.get(outcome).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(outcome, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes sorted lexicographically, for deterministic display.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, &v)| (k.clone(), v)).collect();
        entries.sort();
        entries
    }

    /// The most frequent outcome, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Fold another histogram into this one.
    pub fn merge(&mut self, other: Counts) {
        for (outcome, count) in other.0 {
            *self.0.entry(outcome).or_insert(0) += count;
        }
    }
}
