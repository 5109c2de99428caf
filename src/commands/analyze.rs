use super::Session;
use crate::analysis::{self, AnalysisResult};
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Build the analysis and render it to `output_path`, or to `out` when no
/// path is given.
pub fn analyze(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<AnalysisResult> {
    let result = analysis::build_analysis(session.client, solution)
        .with_context(|| format!("failed to analyze solution '{solution}'"))?;

    match output_path {
        Some(path) => {
            output::write_to_file(format, &result, path)?;
            writeln!(
                out,
                "{} output saved to: {}",
                format.label(),
                path.display()
            )?;
        }
        None => {
            output::create_writer(format, &mut *out).write_analysis(&result)?;
        }
    }

    Ok(result)
}
