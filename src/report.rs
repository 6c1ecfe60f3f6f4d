//! Corpus report orchestration.
//!
//! [`AnalysisReport::build`] runs the whole analysis over one token stream:
//! frequency summaries with and without stopwords, a rank-frequency curve,
//! PMI collocations at a sweep of frequency thresholds, and the PMI of one
//! named word pair.

use log::{info, warn};
use serde::Serialize;

use crate::association::{AssociationFinder, ScoredBigram};
use crate::curve::RankFrequencyCurve;
use crate::error::{AnalysisError, Result};
use crate::frequency::{Counting, FrequencyTable, Ranking, Token};
use crate::stopwords::StopwordSet;

/// One frequency-threshold step of the collocation report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CollocationSweep {
    pub threshold: u64,
    pub top_k: usize,
}

/// Everything the report can be tuned with.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisOptions {
    pub stopword_language: String,
    pub ngram_orders: Vec<usize>,
    pub top_n: usize,
    pub sweeps: Vec<CollocationSweep>,
    pub query: Option<(Token, Token)>,
    /// Also compute a rank-frequency curve for the stopword-filtered stream.
    pub filtered_curve: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            stopword_language: "english".to_string(),
            ngram_orders: vec![1, 2],
            top_n: 30,
            sweeps: [(0, 30), (5, 30), (10, 30), (20, 30), (100, 10)]
                .into_iter()
                .map(|(threshold, top_k)| CollocationSweep { threshold, top_k })
                .collect(),
            query: Some(("NEW".to_string(), "YORK".to_string())),
            filtered_curve: false,
        }
    }
}

impl AnalysisOptions {
    /// Pair thresholds with top-k values; the lists must have equal length.
    pub fn sweeps_from(thresholds: &[u64], top_k: &[usize]) -> Result<Vec<CollocationSweep>> {
        if thresholds.len() != top_k.len() {
            return Err(AnalysisError::configuration(format!(
                "{} thresholds but {} top-k values",
                thresholds.len(),
                top_k.len()
            )));
        }
        Ok(thresholds
            .iter()
            .zip(top_k)
            .map(|(&threshold, &top_k)| CollocationSweep { threshold, top_k })
            .collect())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ngram_orders.is_empty() {
            return Err(AnalysisError::configuration("no n-gram orders to report"));
        }
        if let Some(n) = self.ngram_orders.iter().find(|&&n| n == 0) {
            return Err(AnalysisError::configuration(format!(
                "n-gram order must be >= 1, got {n}"
            )));
        }
        if self.top_n == 0 {
            return Err(AnalysisError::configuration("top-n must be >= 1"));
        }
        if self.sweeps.is_empty() {
            return Err(AnalysisError::configuration("no frequency thresholds configured"));
        }
        if let Some((w1, w2)) = &self.query {
            if w1.is_empty() || w2.is_empty() {
                return Err(AnalysisError::configuration("query pair has an empty word"));
            }
        }
        Ok(())
    }
}

/// Parse a non-negative integer option value. Used as the CLI value parser
/// so negative or fractional thresholds are configuration errors.
pub fn parse_count(value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        AnalysisError::configuration(format!(
            "expected a non-negative integer, got '{value}'"
        ))
    })
}

/// Lowercase, drop stopwords, uppercase what is left.
///
/// Membership is tested on the lowercase form; the output is uppercase.
pub fn filter_stopwords(tokens: &[Token], stopwords: &StopwordSet) -> Vec<Token> {
    tokens
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !stopwords.contains(t))
        .map(|t| t.to_uppercase())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistinctCount {
    pub order: usize,
    pub distinct: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedTerm {
    pub rank: usize,
    pub term: String,
    pub count: u64,
}

/// Counts for one token stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreamSummary {
    pub label: String,
    pub token_count: usize,
    pub distinct: Vec<DistinctCount>,
    pub top_terms: Vec<RankedTerm>,
    pub curve: Option<RankFrequencyCurve>,
}

impl StreamSummary {
    pub fn build(label: &str, tokens: &[Token], options: &AnalysisOptions, with_curve: bool) -> Result<Self> {
        let mut unigrams = None;
        let mut distinct = Vec::with_capacity(options.ngram_orders.len());
        for &order in &options.ngram_orders {
            let table = FrequencyTable::build(tokens, order)?;
            distinct.push(DistinctCount {
                order,
                distinct: table.size(),
            });
            if order == 1 && unigrams.is_none() {
                unigrams = Some(table);
            }
        }
        let unigrams = match unigrams {
            Some(table) => table,
            None => FrequencyTable::build(tokens, 1)?,
        };

        let top_terms = unigrams
            .most_common(options.top_n)
            .into_iter()
            .enumerate()
            .map(|(i, (ngram, count))| RankedTerm {
                rank: i + 1,
                term: ngram.to_string(),
                count,
            })
            .collect();

        let curve = if !with_curve {
            None
        } else if unigrams.is_empty() {
            warn!("{label}: empty token stream, skipping rank-frequency curve");
            None
        } else {
            Some(RankFrequencyCurve::from_table(&unigrams)?)
        };

        Ok(StreamSummary {
            label: label.to_string(),
            token_count: tokens.len(),
            distinct,
            top_terms,
            curve,
        })
    }

    pub fn distinct_for(&self, order: usize) -> Option<usize> {
        self.distinct
            .iter()
            .find(|d| d.order == order)
            .map(|d| d.distinct)
    }
}

/// Top-k PMI bigrams at one frequency threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollocationTable {
    pub threshold: u64,
    pub top_k: usize,
    pub rows: Vec<ScoredBigram>,
}

/// PMI of the configured query pair; `None` when the pair never occurs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedPairScore {
    pub w1: String,
    pub w2: String,
    pub score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stopword_language: String,
    pub stopword_count: usize,
    pub raw: StreamSummary,
    pub filtered: StreamSummary,
    pub collocations: Vec<CollocationTable>,
    pub query: Option<NamedPairScore>,
}

impl AnalysisReport {
    /// Run the full analysis over `tokens`.
    pub fn build(tokens: &[Token], stopwords: &StopwordSet, options: &AnalysisOptions) -> Result<Self> {
        options.validate()?;

        info!("analyzing {} tokens", tokens.len());
        let raw = StreamSummary::build("with stopwords", tokens, options, true)?;

        let filtered_tokens = filter_stopwords(tokens, stopwords);
        info!(
            "{} tokens left after stopword removal",
            filtered_tokens.len()
        );
        let filtered = StreamSummary::build(
            "without stopwords",
            &filtered_tokens,
            options,
            options.filtered_curve,
        )?;

        // A fresh finder per threshold keeps each table independent of sweep order.
        let collocations = options
            .sweeps
            .iter()
            .map(|sweep| {
                let mut finder = AssociationFinder::from_tokens(&filtered_tokens);
                finder.apply_frequency_filter(sweep.threshold);
                CollocationTable {
                    threshold: sweep.threshold,
                    top_k: sweep.top_k,
                    rows: finder.top_k(sweep.top_k),
                }
            })
            .collect();

        let query = options.query.as_ref().map(|(w1, w2)| {
            let finder = AssociationFinder::from_tokens(&filtered_tokens);
            let pair = [w1.clone(), w2.clone()];
            let score = if finder.is_live(&pair) {
                finder.score(&pair).ok()
            } else {
                warn!("query pair ({w1}, {w2}) does not occur in the filtered stream");
                None
            };
            NamedPairScore {
                w1: w1.clone(),
                w2: w2.clone(),
                score,
            }
        });

        Ok(AnalysisReport {
            stopword_language: stopwords.language().to_string(),
            stopword_count: stopwords.len(),
            raw,
            filtered,
            collocations,
            query,
        })
    }
}
