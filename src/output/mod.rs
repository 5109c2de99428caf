//! Renderers for [`AnalysisResult`]: one [`OutputWriter`] per format, each
//! generic over the destination so the same code writes to stdout, a file or
//! a buffer.

pub mod csv;
pub mod json;
pub mod table;
pub mod vertical;

use crate::analysis::AnalysisResult;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::io::Write;
use std::path::Path;

pub use self::csv::CsvWriter;
pub use self::json::JsonWriter;
pub use self::table::TableWriter;
pub use self::vertical::VerticalWriter;

pub const TITLE_PREFIX: &str = "=== FLOW AND CONNECTION REFERENCE ANALYSIS FOR";
pub const NO_FLOWS: &str = "No flows found in the solution.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width columns, one row per reference
    Table,
    /// One block per flow
    #[default]
    Vertical,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Table => "Table",
            OutputFormat::Vertical => "Vertical",
            OutputFormat::Csv => "CSV",
            OutputFormat::Json => "JSON",
        }
    }
}

pub trait OutputWriter {
    fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(format: OutputFormat, writer: W) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Table => Box::new(TableWriter::new(writer)),
        OutputFormat::Vertical => Box::new(VerticalWriter::new(writer)),
        OutputFormat::Csv => Box::new(CsvWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
    }
}

pub fn render_to_string(format: OutputFormat, result: &AnalysisResult) -> Result<String> {
    let mut buffer = Vec::new();
    create_writer(format, &mut buffer).write_analysis(result)?;
    String::from_utf8(buffer).context("rendered output is not UTF-8")
}

/// Render to `path`, creating parent directories as needed.
pub fn write_to_file(format: OutputFormat, result: &AnalysisResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    create_writer(format, &mut writer).write_analysis(result)?;
    writer.flush()?;
    Ok(())
}

/// Cut to `max` characters, ending in `...` when shortened.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn write_title<W: Write>(writer: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(writer, "{TITLE_PREFIX} '{}' ===", result.package_name)?;
    writeln!(writer)
}

fn write_summary<W: Write>(writer: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
    let summary = result.summary();
    writeln!(writer, "=== SUMMARY ===")?;
    writeln!(writer, "Total Flows: {}", summary.total_flows)?;
    writeln!(writer, "Total Connection References: {}", summary.total_references)
}
