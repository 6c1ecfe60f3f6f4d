#![forbid(unsafe_code)]
//! # corpus_stats
//!
//! Descriptive statistics over a tokenized corpus: n-gram frequency tables,
//! log-log rank-frequency curves, and pointwise mutual information between
//! adjacent words with frequency filtering.
//!
//! The pipeline around the engine (story extraction from newswire archives,
//! sentence/word tokenization, stopword lists, report export, plotting) lives
//! in [`loader`], [`tokenize`], [`stopwords`], [`export`] and [`plot`].
//!
//! ## Example
//! ```
//! use corpus_stats::{AnalysisOptions, AnalysisReport, StopwordSet};
//! use corpus_stats::tokenize::whitespace_tokens;
//!
//! let tokens = whitespace_tokens("NEW YORK IS NOT NEW JERSEY BUT NEW YORK IS NEAR");
//! let stopwords = StopwordSet::for_language("english").unwrap();
//! let report = AnalysisReport::build(&tokens, &stopwords, &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.raw.top_terms[0].term, "NEW");
//! assert!(report.query.unwrap().score.is_some());
//! ```

pub mod association;
pub mod curve;
pub mod error;
pub mod export;
pub mod frequency;
pub mod loader;
pub mod plot;
pub mod report;
pub mod stopwords;
pub mod tokenize;

pub use association::{AssociationFinder, ScoredBigram};
pub use curve::{CurvePoint, CurveRenderer, PlotLabels, RankFrequencyCurve};
pub use error::{AnalysisError, Result};
pub use export::{ExportFormat, SeriesWriter, csv_safe_cell, export_report, render_summary};
pub use frequency::{Counting, FrequencyTable, NGram, Ranking, Token};
pub use loader::{collect_files, extract_stories, load_stories};
pub use plot::ChartRenderer;
pub use report::{
    AnalysisOptions, AnalysisReport, CollocationSweep, CollocationTable, NamedPairScore,
    StreamSummary, filter_stopwords, parse_count,
};
pub use stopwords::StopwordSet;
