use super::{truncate, write_summary, write_title, OutputWriter, NO_FLOWS};
use crate::analysis::AnalysisResult;
use anyhow::Result;
use std::io::Write;

const SEPARATOR_WIDTH: usize = 235;
const NAME_WIDTH: usize = 25;
const PROVIDER_WIDTH: usize = 35;

pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn row(&mut self, cells: [&str; 6]) -> Result<()> {
        let [flow_id, flow_name, ref_id, logical_name, provider, connection_id] = cells;
        writeln!(
            self.writer,
            "{flow_id:<38} | {flow_name:<25} | {ref_id:<38} | {logical_name:<50} | {provider:<35} | {connection_id:<38}"
        )?;
        Ok(())
    }

    fn separator(&mut self) -> Result<()> {
        writeln!(self.writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TableWriter<W> {
    fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()> {
        write_title(&mut self.writer, result)?;

        if result.workflows.is_empty() {
            writeln!(self.writer, "{NO_FLOWS}")?;
        } else {
            self.row([
                "Flow ID",
                "Flow Name",
                "Conn Ref ID",
                "Conn Ref Logical Name",
                "Provider",
                "Connection ID",
            ])?;
            self.separator()?;

            for workflow in &result.workflows {
                let name = truncate(&workflow.name, NAME_WIDTH);
                if workflow.references.is_empty() {
                    self.row([&workflow.id, &name, "(No connection references)", "", "", ""])?;
                    continue;
                }

                for (index, reference) in workflow.references.iter().enumerate() {
                    let (id, name) = if index == 0 {
                        (workflow.id.as_str(), name.as_str())
                    } else {
                        ("", "")
                    };
                    self.row([
                        id,
                        name,
                        &reference.reference_id,
                        &reference.logical_name,
                        &truncate(&reference.provider, PROVIDER_WIDTH),
                        &reference.connection_id,
                    ])?;
                }

                if workflow.references.len() > 1 {
                    self.separator()?;
                }
            }
        }

        writeln!(self.writer)?;
        write_summary(&mut self.writer, result)?;
        Ok(())
    }
}
