use super::{OutputWriter, NO_FLOWS};
use crate::analysis::AnalysisResult;
use anyhow::Result;
use std::io::Write;

pub const HEADER: &str = "FlowId,FlowName,ConnectionReferenceId,LogicalName,Provider,ConnectionId";

/// Header line unquoted, every record field quoted.
pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()> {
        writeln!(self.writer, "{HEADER}")?;

        if result.workflows.is_empty() {
            writeln!(self.writer, "# {NO_FLOWS}")?;
            writeln!(self.writer, "# Total Flows: 0")?;
            writeln!(self.writer, "# Total Connection References: 0")?;
            return Ok(());
        }

        let mut records = ::csv::WriterBuilder::new()
            .quote_style(::csv::QuoteStyle::Always)
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(&mut self.writer);

        for workflow in &result.workflows {
            if workflow.references.is_empty() {
                records.write_record([workflow.id.as_str(), &workflow.name, "", "", "", ""])?;
                continue;
            }
            for reference in &workflow.references {
                records.write_record([
                    workflow.id.as_str(),
                    &workflow.name,
                    &reference.reference_id,
                    &reference.logical_name,
                    &reference.provider,
                    &reference.connection_id,
                ])?;
            }
        }
        records.flush()?;
        Ok(())
    }
}
