//! Bigram association scoring.
//!
//! An [`AssociationFinder`] owns the unigram and bigram tables of one token
//! stream. A frequency filter narrows which bigrams are eligible for scoring
//! and ranking; the tables themselves are never modified, so counts reported
//! for a bigram always come from the full stream.

use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::frequency::{Counting, FrequencyTable, NGram, Token};

/// A ranked bigram with the counts its score was derived from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredBigram {
    pub bigram: NGram,
    pub score: f64,
    pub w1_freq: u64,
    pub w2_freq: u64,
    pub bigram_freq: u64,
}

impl ScoredBigram {
    pub fn w1(&self) -> &str {
        &self.bigram.tokens()[0]
    }

    pub fn w2(&self) -> &str {
        &self.bigram.tokens()[1]
    }
}

/// Pointwise mutual information from raw counts:
/// `log2((n_xy / n2) / ((n_x / n1) * (n_y / n1)))`.
///
/// The count ratio `n_xy / (n_x * n_y)` is a single correctly rounded
/// division and the totals only contribute a shared factor, so bigrams with
/// equal ratios get bit-identical scores.
fn pmi(n_xy: u64, n_x: u64, n_y: u64, n1: u64, n2: u64) -> f64 {
    let ratio = n_xy as f64 / (n_x as f64 * n_y as f64);
    let scale = n1 as f64 * n1 as f64 / n2 as f64;
    (ratio * scale).log2()
}

/// Compare the PMI of two bigrams exactly.
///
/// Both share `n1` and `n2`, so PMI order is the order of
/// `bigram_freq / (w1_freq * w2_freq)`, decided here by cross-multiplying.
fn cmp_association(a: &ScoredBigram, b: &ScoredBigram) -> Ordering {
    let lhs = (a.bigram_freq as u128)
        .checked_mul(b.w1_freq as u128)
        .and_then(|v| v.checked_mul(b.w2_freq as u128));
    let rhs = (b.bigram_freq as u128)
        .checked_mul(a.w1_freq as u128)
        .and_then(|v| v.checked_mul(a.w2_freq as u128));
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        _ => a.score.total_cmp(&b.score),
    }
}

/// Scores bigrams of one token stream by PMI.
#[derive(Clone, Debug)]
pub struct AssociationFinder {
    unigrams: FrequencyTable,
    bigrams: FrequencyTable,
    min_freq: u64,
}

impl AssociationFinder {
    /// Count unigrams and bigrams of `tokens`.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        AssociationFinder {
            unigrams: FrequencyTable::count_windows(tokens, 1),
            bigrams: FrequencyTable::count_windows(tokens, 2),
            min_freq: 0,
        }
    }

    /// Wrap tables counted elsewhere. Orders must be 1 and 2, and every word
    /// of every bigram must have a unigram count.
    pub fn from_tables(unigrams: FrequencyTable, bigrams: FrequencyTable) -> Result<Self> {
        if unigrams.order() != 1 || bigrams.order() != 2 {
            return Err(AnalysisError::configuration(format!(
                "association needs unigram and bigram tables, got orders {} and {}",
                unigrams.order(),
                bigrams.order()
            )));
        }
        for (bigram, _) in bigrams.iter() {
            if let Some(word) = bigram
                .tokens()
                .iter()
                .find(|word| unigrams.get(std::slice::from_ref(*word)) == 0)
            {
                return Err(AnalysisError::invalid_input(format!(
                    "bigram ({}) contains {word}, which has no unigram count",
                    bigram
                )));
            }
        }
        Ok(AssociationFinder {
            unigrams,
            bigrams,
            min_freq: 0,
        })
    }

    pub fn unigrams(&self) -> &FrequencyTable {
        &self.unigrams
    }

    pub fn bigrams(&self) -> &FrequencyTable {
        &self.bigrams
    }

    /// Effective threshold after every filter applied so far.
    pub fn min_frequency(&self) -> u64 {
        self.min_freq
    }

    /// Drop every bigram with count `< tau` from scoring and ranking.
    ///
    /// Filters compose: the live set only ever shrinks, so a lower `tau`
    /// after a higher one has no effect.
    pub fn apply_frequency_filter(&mut self, tau: u64) {
        self.min_freq = self.min_freq.max(tau);
        debug!(
            "frequency filter {} -> {} live bigrams",
            self.min_freq,
            self.live_count()
        );
    }

    fn live_freq(&self, bigram: &[Token]) -> u64 {
        let count = self.bigrams.get(bigram);
        if count >= self.min_freq { count } else { 0 }
    }

    pub fn is_live(&self, bigram: &[Token]) -> bool {
        self.live_freq(bigram) > 0
    }

    /// Number of bigrams still eligible for ranking.
    pub fn live_count(&self) -> usize {
        self.bigrams
            .iter()
            .filter(|(_, count)| *count >= self.min_freq)
            .count()
    }

    /// PMI of `bigram`.
    ///
    /// Fails with an arithmetic error when the bigram has no live count
    /// (never seen, or removed by a filter), since `log2(0)` is undefined.
    pub fn score(&self, bigram: &[Token]) -> Result<f64> {
        Ok(self.scored(bigram)?.score)
    }

    /// Score plus the counts it was computed from.
    pub fn scored(&self, bigram: &[Token]) -> Result<ScoredBigram> {
        if bigram.len() != 2 {
            return Err(AnalysisError::invalid_input(format!(
                "expected a bigram, got {} tokens",
                bigram.len()
            )));
        }
        let bigram_freq = self.live_freq(bigram);
        if bigram_freq == 0 {
            return Err(AnalysisError::arithmetic(format!(
                "PMI undefined for ({}, {}): bigram count is zero",
                bigram[0], bigram[1]
            )));
        }
        let key = NGram::from(bigram);
        Ok(self.score_entry(&key, bigram_freq))
    }

    fn score_entry(&self, bigram: &NGram, bigram_freq: u64) -> ScoredBigram {
        let words = bigram.tokens();
        let w1_freq = self.unigrams.get(&words[..1]);
        let w2_freq = self.unigrams.get(&words[1..]);
        ScoredBigram {
            bigram: bigram.clone(),
            score: pmi(
                bigram_freq,
                w1_freq,
                w2_freq,
                self.unigrams.total(),
                self.bigrams.total(),
            ),
            w1_freq,
            w2_freq,
            bigram_freq,
        }
    }

    /// The `k` highest-PMI live bigrams.
    ///
    /// Order: score descending, then bigram count descending, then first-seen
    /// order in the stream. `k` beyond the live population returns all of it.
    pub fn top_k(&self, k: usize) -> Vec<ScoredBigram> {
        let mut scored: Vec<ScoredBigram> = self
            .bigrams
            .iter()
            .filter(|(_, count)| *count >= self.min_freq)
            .map(|(bigram, count)| self.score_entry(bigram, count))
            .collect();
        scored.sort_by(|a, b| {
            cmp_association(b, a).then_with(|| b.bigram_freq.cmp(&a.bigram_freq))
        });
        scored.truncate(k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| w.to_string()).collect()
    }

    const EPS: f64 = 1e-12;

    #[test]
    fn test_pmi_matches_formula() {
        // 100 tokens: NEW YORK twice, the rest distinct fillers.
        let mut stream = tokens(&["NEW", "YORK"]);
        stream.extend((0..48).map(|i| format!("F{i}")));
        stream.extend(tokens(&["NEW", "YORK"]));
        stream.extend((48..96).map(|i| format!("F{i}")));
        assert_eq!(stream.len(), 100);

        let finder = AssociationFinder::from_tokens(&stream);
        assert_eq!(finder.bigrams().total(), 99);

        let expected = ((2.0_f64 / 99.0) / ((2.0 / 100.0) * (2.0 / 100.0))).log2();
        let score = finder.score(&tokens(&["NEW", "YORK"])).unwrap();
        assert!((score - expected).abs() < EPS, "{score} vs {expected}");
    }

    #[test]
    fn test_absent_bigram_is_arithmetic_error() {
        let finder = AssociationFinder::from_tokens(&tokens(&["a", "b", "c"]));
        let err = finder.score(&tokens(&["c", "a"])).unwrap_err();
        assert!(matches!(err, AnalysisError::Arithmetic(_)));

        let err = finder.score(&tokens(&["a"])).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_filter_is_cumulative() {
        let stream = tokens(&["a", "b", "a", "b", "a", "b", "c", "d"]);
        let mut finder = AssociationFinder::from_tokens(&stream);
        let all = finder.live_count();

        finder.apply_frequency_filter(0);
        assert_eq!(finder.live_count(), all);

        finder.apply_frequency_filter(3);
        assert_eq!(finder.live_count(), 1);
        assert!(finder.is_live(&tokens(&["a", "b"])));

        // relaxing is a no-op
        finder.apply_frequency_filter(1);
        assert_eq!(finder.min_frequency(), 3);
        assert_eq!(finder.live_count(), 1);

        let err = finder.score(&tokens(&["c", "d"])).unwrap_err();
        assert!(matches!(err, AnalysisError::Arithmetic(_)));
    }

    #[test]
    fn test_top_k_reports_unfiltered_counts() {
        let stream = tokens(&["x", "y", "x", "y", "z", "x"]);
        let mut finder = AssociationFinder::from_tokens(&stream);
        finder.apply_frequency_filter(2);
        let top = finder.top_k(10);
        assert_eq!(top.len(), 1);
        let row = &top[0];
        assert_eq!((row.w1(), row.w2()), ("x", "y"));
        assert_eq!(row.bigram_freq, 2);
        assert_eq!(row.w1_freq, 3);
        assert_eq!(row.w2_freq, 2);
    }

    fn unigram_table(counts: &[(&str, u64)]) -> FrequencyTable {
        FrequencyTable::from_counts(
            1,
            counts
                .iter()
                .map(|&(w, c)| (NGram::new(vec![w.to_string()]), c)),
        )
        .unwrap()
    }

    #[test]
    fn test_top_k_tie_break_by_count_then_first_seen() {
        // (p,q) = 2/(11*6), (r,s) = 1/(3*11) and (a,b) = 1/(11*3) share a PMI.
        let unigrams = unigram_table(&[
            ("p", 11),
            ("q", 6),
            ("r", 3),
            ("s", 11),
            ("a", 11),
            ("b", 3),
            ("z", 955),
        ]);
        assert_eq!(unigrams.total(), 1000);
        let bigrams = FrequencyTable::from_counts(
            2,
            vec![
                (NGram::pair("r", "s"), 1),
                (NGram::pair("a", "b"), 1),
                (NGram::pair("p", "q"), 2),
                (NGram::pair("z", "z"), 995),
            ],
        )
        .unwrap();
        assert_eq!(bigrams.total(), 999);
        let finder = AssociationFinder::from_tables(unigrams, bigrams).unwrap();
        let top = finder.top_k(10);
        let order: Vec<String> = top.iter().map(|row| row.bigram.to_string()).collect();
        assert_eq!(order, vec!["p q", "r s", "a b", "z z"]);
        assert_eq!(top[0].score, top[1].score);
        assert_eq!(top[1].score, top[2].score);
    }

    #[test]
    fn test_equal_ratios_score_identically() {
        let stream = tokens(&["x", "y", "y", "x", "x", "z", "q", "y"]);
        let finder = AssociationFinder::from_tokens(&stream);
        // x y, y y, y x and x x all have count 1 over word counts 3 and 3
        let xy = finder.score(&tokens(&["x", "y"])).unwrap();
        let yx = finder.score(&tokens(&["y", "x"])).unwrap();
        assert_eq!(xy, yx);
        let order: Vec<String> = finder
            .top_k(usize::MAX)
            .iter()
            .filter(|row| row.score == xy)
            .map(|row| row.bigram.to_string())
            .collect();
        assert_eq!(order, vec!["x y", "y y", "y x", "x x"]);
    }

    #[test]
    fn test_from_tables_rejects_unknown_words() {
        let unigrams = unigram_table(&[("a", 3)]);
        let bigrams = FrequencyTable::from_counts(2, vec![(NGram::pair("a", "b"), 2)]).unwrap();
        let err = AssociationFinder::from_tables(unigrams, bigrams).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));

        let empty = unigram_table(&[]);
        let bigrams = FrequencyTable::from_counts(2, vec![(NGram::pair("a", "a"), 1)]).unwrap();
        let err = AssociationFinder::from_tables(empty, bigrams).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_from_tables_checks_orders() {
        let t1 = FrequencyTable::build(&tokens(&["a", "b"]), 1).unwrap();
        let t1b = t1.clone();
        let err = AssociationFinder::from_tables(t1, t1b).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }
}
