//! N-gram frequency tables.
//!
//! A [`FrequencyTable`] is built once from a token stream by sliding a window of
//! width `n` across it with stride 1. Keys are kept in first-seen order, which
//! is what ranking uses to break ties between equal counts.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// A single word token as produced by the tokenizer.
pub type Token = String;

/// An ordered tuple of `n >= 1` tokens. `(A, B)` and `(B, A)` are different keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NGram(Vec<Token>);

impl NGram {
    pub fn new(tokens: Vec<Token>) -> Self {
        NGram(tokens)
    }

    /// Two-token key, the shape association scoring works on.
    pub fn pair(w1: &str, w2: &str) -> Self {
        NGram(vec![w1.to_string(), w2.to_string()])
    }

    pub fn order(&self) -> usize {
        self.0.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

impl Borrow<[Token]> for NGram {
    fn borrow(&self) -> &[Token] {
        &self.0
    }
}

impl From<&[Token]> for NGram {
    fn from(window: &[Token]) -> Self {
        NGram(window.to_vec())
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Counting capability: raw lookups over a table.
pub trait Counting {
    /// Count for `ngram`, `0` when it was never seen.
    fn get(&self, ngram: &[Token]) -> u64;
    /// Sum of all counts.
    fn total(&self) -> u64;
    /// Number of distinct n-grams.
    fn size(&self) -> usize;
}

/// Ranking capability: ordered enumeration by descending count.
pub trait Ranking {
    /// The `k` most frequent entries, ties in first-seen order.
    /// `k` larger than the population returns every entry.
    fn most_common(&self, k: usize) -> Vec<(&NGram, u64)>;
}

/// Occurrence counts of every contiguous n-gram in a token stream.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
    order: usize,
    counts: IndexMap<NGram, u64>,
    total: u64,
}

impl FrequencyTable {
    /// Count every window of width `n` over `tokens`.
    ///
    /// Fails with a configuration error when `n == 0`. A stream shorter than
    /// `n` yields an empty table.
    ///
    /// # Example
    /// ```
    /// use corpus_stats::{Counting, FrequencyTable};
    /// let tokens: Vec<String> = ["A", "B", "A", "B", "A"].iter().map(|s| s.to_string()).collect();
    /// let bigrams = FrequencyTable::build(&tokens, 2).unwrap();
    /// assert_eq!(bigrams.size(), 2);
    /// assert_eq!(bigrams.total(), 4);
    /// ```
    pub fn build(tokens: &[Token], n: usize) -> Result<Self> {
        if n == 0 {
            return Err(AnalysisError::configuration("n-gram order must be >= 1"));
        }
        Ok(Self::count_windows(tokens, n))
    }

    /// Single pass over `tokens.windows(n)`. The borrowed window is the lookup
    /// key; an owned key is only allocated the first time an n-gram appears.
    pub(crate) fn count_windows(tokens: &[Token], n: usize) -> Self {
        let mut counts: IndexMap<NGram, u64> = IndexMap::new();
        let mut total = 0u64;
        if n <= tokens.len() {
            for window in tokens.windows(n) {
                match counts.get_mut(window) {
                    Some(count) => *count += 1,
                    None => {
                        counts.insert(NGram::from(window), 1);
                    }
                }
                total += 1;
            }
        }
        debug!(
            "counted {} distinct {}-grams over {} windows",
            counts.len(),
            n,
            total
        );
        FrequencyTable {
            order: n,
            counts,
            total,
        }
    }

    /// Build a table from precomputed counts. Repeated keys are summed; zero
    /// counts are dropped. Every key must have exactly `order` tokens.
    pub fn from_counts<I>(order: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NGram, u64)>,
    {
        if order == 0 {
            return Err(AnalysisError::configuration("n-gram order must be >= 1"));
        }
        let mut counts: IndexMap<NGram, u64> = IndexMap::new();
        let mut total = 0u64;
        for (ngram, count) in entries {
            if ngram.order() != order {
                return Err(AnalysisError::invalid_input(format!(
                    "n-gram '{}' has {} tokens, table order is {}",
                    ngram,
                    ngram.order(),
                    order
                )));
            }
            if count == 0 {
                continue;
            }
            *counts.entry(ngram).or_insert(0) += count;
            total += count;
        }
        Ok(FrequencyTable {
            order,
            counts,
            total,
        })
    }

    /// Window width this table was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&NGram, u64)> {
        self.counts.iter().map(|(ngram, count)| (ngram, *count))
    }

    /// Position of `ngram` in first-seen order.
    pub(crate) fn position(&self, ngram: &[Token]) -> Option<usize> {
        self.counts.get_index_of(ngram)
    }

    /// Every entry, descending by count. `sort_by` is stable, so equal counts
    /// keep their first-seen order.
    pub fn ranked(&self) -> Vec<(&NGram, u64)> {
        let mut ranked: Vec<(&NGram, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Counting for FrequencyTable {
    fn get(&self, ngram: &[Token]) -> u64 {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn size(&self) -> usize {
        self.counts.len()
    }
}

impl Ranking for FrequencyTable {
    fn most_common(&self, k: usize) -> Vec<(&NGram, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }
}
