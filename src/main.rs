#![forbid(unsafe_code)]
//! # corpus_stats CLI
//!
//! Three stages, each usable on its own and chainable through pipes:
//!
//! ```bash
//! corpus_stats extract data/*.xml.gz > stories.txt
//! corpus_stats tokenize stories.txt --output corpus.txt
//! corpus_stats analyze corpus.txt --export-format csv --plot plot.csv
//! ```
//!
//! See `--help` on each subcommand for all available options.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use corpus_stats::tokenize;
use corpus_stats::{
    AnalysisError, AnalysisOptions, AnalysisReport, ChartRenderer, CurveRenderer, ExportFormat,
    PlotLabels, Result, SeriesWriter, StopwordSet, collect_files, export_report, load_stories,
    parse_count, render_summary,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract story paragraphs from XML / .gz / .zip newswire files
    Extract {
        /// Files or directories to read
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write paragraphs here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Tokenize text into one uppercase sentence per line
    Tokenize {
        /// Text file (stdin when omitted)
        input: Option<PathBuf>,

        /// Write the corpus here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Frequency, rank-frequency and PMI analysis of a tokenized corpus
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Corpus file (stdin when omitted)
    input: Option<PathBuf>,

    /// Built-in stopword list to use
    #[arg(long, default_value = "english")]
    language: String,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// N-gram orders whose distinct counts are reported
    #[arg(long, value_delimiter = ',', default_value = "1,2", value_parser = parse_order)]
    ngram_orders: Vec<usize>,

    /// Number of most frequent words to list
    #[arg(long, default_value_t = 30)]
    top_n: usize,

    /// Minimum bigram frequencies for the PMI tables
    #[arg(long, value_delimiter = ',', default_value = "0,5,10,20,100", value_parser = parse_count)]
    thresholds: Vec<u64>,

    /// Number of PMI pairs per threshold (one value per threshold)
    #[arg(long, value_delimiter = ',', default_value = "30,30,30,30,10", value_parser = parse_order)]
    top_k: Vec<usize>,

    /// Word pair whose PMI is reported, e.g. NEW,YORK
    #[arg(long, value_delimiter = ',', default_value = "NEW,YORK")]
    query: Vec<String>,

    /// Skip the named-pair PMI lookup
    #[arg(long, default_value_t = false)]
    no_query: bool,

    /// Also compute the rank-frequency curve without stopwords
    #[arg(long, default_value_t = false)]
    filtered_curve: bool,

    /// Write the rank-frequency plot (.svg) or its data series (.csv, .tsv, .json) here
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn parse_order(value: &str) -> Result<usize> {
    Ok(parse_count(value)? as usize)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            AnalysisError::input_unavailable(format!("{}: {e}", path.display()))
        }),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| AnalysisError::input_unavailable(format!("stdin: {e}")))?;
            Ok(text)
        }
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn extract(paths: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(AnalysisError::input_unavailable(format!(
                "{}: no such file or directory",
                path.display()
            )));
        }
        files.extend(collect_files(path));
    }
    let stories = load_stories(&files)?;
    info!("{} story paragraphs from {} files", stories.len(), files.len());
    let mut out = open_output(output)?;
    for paragraph in &stories {
        writeln!(out, "{paragraph}")?;
    }
    out.flush()?;
    Ok(())
}

fn tokenize_text(input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let sentences = tokenize::sentences(&text);
    info!("{} sentences", sentences.len());
    tokenize::write_corpus(&sentences, open_output(output)?)
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let query = if args.no_query {
        None
    } else {
        match args.query.as_slice() {
            [w1, w2] => Some((w1.clone(), w2.clone())),
            other => {
                return Err(AnalysisError::configuration(format!(
                    "--query needs exactly two words, got {}",
                    other.len()
                )));
            }
        }
    };
    let options = AnalysisOptions {
        stopword_language: args.language.clone(),
        ngram_orders: args.ngram_orders.clone(),
        top_n: args.top_n,
        sweeps: AnalysisOptions::sweeps_from(&args.thresholds, &args.top_k)?,
        query,
        filtered_curve: args.filtered_curve,
    };
    options.validate()?;

    let mut stopwords = StopwordSet::for_language(&options.stopword_language)?;
    if let Some(path) = &args.stopwords {
        stopwords.extend_from_file(path)?;
    }

    let text = read_input(args.input.as_deref())?;
    let tokens = tokenize::flatten(tokenize::read_corpus(&text));
    let report = AnalysisReport::build(&tokens, &stopwords, &options)?;

    println!("{}", render_summary(&report));

    let stem = args
        .input
        .as_deref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string());
    export_report(&report, &stem, &args.out_dir, args.export_format)?;

    if let Some(plot) = &args.plot {
        match &report.raw.curve {
            Some(curve) => {
                let renderer: Box<dyn CurveRenderer> = if ChartRenderer::supports(plot) {
                    Box::new(ChartRenderer::default())
                } else {
                    Box::new(SeriesWriter::new(match plot.extension().and_then(|e| e.to_str()) {
                        Some("json") => ExportFormat::Json,
                        Some("tsv") => ExportFormat::Tsv,
                        _ => ExportFormat::Csv,
                    }))
                };
                let path = renderer.render(curve, &PlotLabels::default(), plot)?;
                info!("wrote rank-frequency plot to {}", path.display());
            }
            None => warn!("no tokens, rank-frequency series not written"),
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Extract { paths, output } => extract(paths, output.as_deref()),
        Command::Tokenize { input, output } => tokenize_text(input.as_deref(), output.as_deref()),
        Command::Analyze(args) => analyze(args),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
