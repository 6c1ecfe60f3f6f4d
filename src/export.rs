//! Report output: a human-readable summary plus CSV/TSV/JSON exports.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::ValueEnum;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;

use crate::curve::{CurvePoint, CurveRenderer, PlotLabels, RankFrequencyCurve};
use crate::error::Result;
use crate::report::{AnalysisReport, StreamSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Neutralize cells a spreadsheet would evaluate as a formula.
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// `<stem>_<YYYYMMDD_HHMMSS>`, the prefix shared by all files of one run.
pub fn timestamped_stem(stem: &str) -> String {
    format!("{}_{}", stem, Local::now().format("%Y%m%d_%H%M%S"))
}

/// Plain-text layout of a report; see [`render_summary`].
struct Summary<'a>(&'a AnalysisReport);

fn write_stream(f: &mut fmt::Formatter<'_>, summary: &StreamSummary) -> fmt::Result {
    writeln!(f, "{}:", summary.label.to_uppercase())?;
    writeln!(f, "Tokens:\t{}", summary.token_count)?;
    for d in &summary.distinct {
        writeln!(f, "Unique {}-grams:\t{}", d.order, d.distinct)?;
    }
    writeln!(f, "Top {} words:", summary.top_terms.len())?;
    for term in &summary.top_terms {
        writeln!(f, "  {:>3}  {}\t{}", term.rank, term.term, term.count)?;
    }
    if let Some(curve) = &summary.curve {
        writeln!(f, "Rank-frequency curve:\t{} points", curve.len())?;
    }
    writeln!(f)
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write_stream(f, &report.raw)?;
        let language = if report.stopword_language.is_empty() {
            "none"
        } else {
            report.stopword_language.as_str()
        };
        writeln!(f, "Stopwords: {} ({} words)\n", language, report.stopword_count)?;
        write_stream(f, &report.filtered)?;

        for table in &report.collocations {
            writeln!(
                f,
                "Top {} PMI word pairs, min frequency {}:",
                table.top_k, table.threshold
            )?;
            writeln!(
                f,
                "{: <32}{: <10}{: <9}{: <9}{: <9}",
                "Pair", "PMI", "W1 Freq", "W2 Freq", "BG Freq"
            )?;
            for row in &table.rows {
                writeln!(
                    f,
                    "{: <32}{: <10.3}{: <9}{: <9}{: <9}",
                    format!("{}, {}", row.w1(), row.w2()),
                    row.score,
                    row.w1_freq,
                    row.w2_freq,
                    row.bigram_freq
                )?;
            }
            writeln!(f)?;
        }

        if let Some(query) = &report.query {
            match query.score {
                Some(score) => writeln!(f, "PMI ({}, {}):\t{:.3}", query.w1, query.w2, score)?,
                None => writeln!(f, "PMI ({}, {}):\tpair not found", query.w1, query.w2)?,
            }
        }
        Ok(())
    }
}

/// Plain-text report, the same text the CLI prints.
pub fn render_summary(report: &AnalysisReport) -> String {
    Summary(report).to_string()
}

fn table_writer(path: &Path, format: ExportFormat) -> Result<csv::Writer<File>> {
    Ok(WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_path(path)?)
}

fn write_delimited(report: &AnalysisReport, base: &Path, format: ExportFormat) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let streams = [&report.raw, &report.filtered];

    let distinct_path = output_path(base, "distinct", ext);
    let mut wtr = table_writer(&distinct_path, format)?;
    wtr.write_record(["stream", "order", "distinct"])?;
    for s in streams {
        for d in &s.distinct {
            wtr.write_record([s.label.clone(), d.order.to_string(), d.distinct.to_string()])?;
        }
    }
    wtr.flush()?;

    let terms_path = output_path(base, "topterms", ext);
    let mut wtr = table_writer(&terms_path, format)?;
    wtr.write_record(["stream", "rank", "term", "count"])?;
    for s in streams {
        for t in &s.top_terms {
            wtr.write_record([
                s.label.clone(),
                t.rank.to_string(),
                csv_safe_cell(t.term.clone()),
                t.count.to_string(),
            ])?;
        }
    }
    wtr.flush()?;

    let pmi_path = output_path(base, "pmi", ext);
    let mut wtr = table_writer(&pmi_path, format)?;
    wtr.write_record(["threshold", "w1", "w2", "pmi", "w1_freq", "w2_freq", "bigram_freq"])?;
    for table in &report.collocations {
        for row in &table.rows {
            wtr.write_record([
                table.threshold.to_string(),
                csv_safe_cell(row.w1().to_string()),
                csv_safe_cell(row.w2().to_string()),
                row.score.to_string(),
                row.w1_freq.to_string(),
                row.w2_freq.to_string(),
                row.bigram_freq.to_string(),
            ])?;
        }
    }
    wtr.flush()?;

    let mut written = vec![distinct_path, terms_path, pmi_path];
    if let Some(curve) = &report.raw.curve {
        let curve_path = output_path(base, "curve", ext);
        SeriesWriter::new(format).render(curve, &PlotLabels::default(), &curve_path)?;
        written.push(curve_path);
    }
    Ok(written)
}

/// `<base>_<table>.<ext>` next to `base`.
fn output_path(base: &Path, table: &str, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!("_{table}.{ext}"));
    PathBuf::from(name)
}

/// Write `report` into `out_dir` as `<stem>_<timestamp>_*` files.
pub fn export_report(
    report: &AnalysisReport,
    stem: &str,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let base = out_dir.join(timestamped_stem(stem));
    let written = match format {
        ExportFormat::Txt => {
            let path = output_path(&base, "report", "txt");
            fs::write(&path, render_summary(report))?;
            vec![path]
        }
        ExportFormat::Json => {
            let path = output_path(&base, "report", "json");
            let writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(writer, report)?;
            vec![path]
        }
        ExportFormat::Csv | ExportFormat::Tsv => write_delimited(report, &base, format)?,
    };
    for path in &written {
        info!("wrote {}", path.display());
    }
    Ok(written)
}

#[derive(Serialize)]
struct SeriesDocument<'a> {
    title: &'a str,
    x_label: &'a str,
    y_label: &'a str,
    points: &'a [CurvePoint],
}

/// Persists a curve's coordinate series for an external plotting tool.
/// Delimited formats use the axis labels as header; JSON keeps the title.
#[derive(Clone, Copy, Debug)]
pub struct SeriesWriter {
    format: ExportFormat,
}

impl SeriesWriter {
    pub fn new(format: ExportFormat) -> Self {
        SeriesWriter { format }
    }
}

impl CurveRenderer for SeriesWriter {
    fn render(
        &self,
        curve: &RankFrequencyCurve,
        labels: &PlotLabels,
        path: &Path,
    ) -> Result<PathBuf> {
        match self.format {
            ExportFormat::Json => {
                let mut writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(
                    &mut writer,
                    &SeriesDocument {
                        title: &labels.title,
                        x_label: &labels.x_label,
                        y_label: &labels.y_label,
                        points: curve.points(),
                    },
                )?;
                writer.flush()?;
            }
            format => {
                let mut wtr = table_writer(path, format)?;
                wtr.write_record([labels.x_label.as_str(), labels.y_label.as_str()])?;
                for p in curve.points() {
                    wtr.write_record([p.log_rank.to_string(), p.log_frequency.to_string()])?;
                }
                wtr.flush()?;
            }
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_safe_cell() {
        assert_eq!(csv_safe_cell("=SUM(A1)".into()), "'=SUM(A1)");
        assert_eq!(csv_safe_cell("-1".into()), "'-1");
        assert_eq!(csv_safe_cell("'@SAFE".into()), "'@SAFE");
        assert_eq!(csv_safe_cell("YORK".into()), "YORK");
    }

    #[test]
    fn test_series_writer_csv() {
        let dir = tempfile::tempdir().unwrap();
        let tokens: Vec<String> = ["A", "A", "B"].iter().map(|s| s.to_string()).collect();
        let table = crate::frequency::FrequencyTable::build(&tokens, 1).unwrap();
        let curve = RankFrequencyCurve::from_table(&table).unwrap();

        let path = dir.path().join("plot.csv");
        let written = SeriesWriter::new(ExportFormat::Csv)
            .render(&curve, &PlotLabels::default(), &path)
            .unwrap();
        let text = fs::read_to_string(written).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("log(rank),log(frequency)"));
        assert_eq!(lines.next(), Some(format!("0,{}", 2f64.log10()).as_str()));
        assert_eq!(lines.count(), 1);
    }
}
