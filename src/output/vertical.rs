use super::{write_summary, write_title, OutputWriter, NO_FLOWS};
use crate::analysis::{AnalysisResult, WorkflowAnalysis};
use anyhow::Result;
use std::io::Write;

pub struct VerticalWriter<W: Write> {
    writer: W,
}

impl<W: Write> VerticalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_workflow(&mut self, workflow: &WorkflowAnalysis) -> Result<()> {
        writeln!(self.writer, "Flow: {}", workflow.name)?;
        writeln!(self.writer, "  ID: {}", workflow.id)?;

        if workflow.references.is_empty() {
            writeln!(self.writer, "  Connection References: None")?;
        } else {
            writeln!(
                self.writer,
                "  Connection References ({}):",
                workflow.references.len()
            )?;
            for reference in &workflow.references {
                writeln!(self.writer, "    - Logical Name: {}", reference.logical_name)?;
                writeln!(
                    self.writer,
                    "      Connection Reference ID: {}",
                    reference.reference_id
                )?;
                writeln!(self.writer, "      Provider: {}", reference.provider)?;
                writeln!(self.writer, "      Connection ID: {}", reference.connection_id)?;
                writeln!(self.writer)?;
            }
        }

        writeln!(self.writer, "{}", "-".repeat(80))?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for VerticalWriter<W> {
    fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()> {
        write_title(&mut self.writer, result)?;

        if result.workflows.is_empty() {
            writeln!(self.writer, "{NO_FLOWS}")?;
            writeln!(self.writer)?;
        } else {
            for workflow in &result.workflows {
                self.write_workflow(workflow)?;
            }
        }

        write_summary(&mut self.writer, result)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::{AnalysisResult, ReferenceDetail, WorkflowAnalysis};
    use crate::output::{render_to_string, OutputFormat};
    use indoc::formatdoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vertical_layout() {
        let result = AnalysisResult {
            package_name: "Pkg".into(),
            workflows: vec![
                WorkflowAnalysis {
                    id: "wf-1".into(),
                    name: "Orders".into(),
                    references: vec![ReferenceDetail {
                        reference_id: "Not Found".into(),
                        logical_name: "new_shared_sql_wf1".into(),
                        provider: "shared_sql".into(),
                        connection_id: "Not Found".into(),
                    }],
                },
                WorkflowAnalysis {
                    id: "wf-2".into(),
                    name: "Idle".into(),
                    references: vec![],
                },
            ],
        };

        let rule = "-".repeat(80);
        let expected = formatdoc! {"
                === FLOW AND CONNECTION REFERENCE ANALYSIS FOR 'Pkg' ===

                Flow: Orders
                  ID: wf-1
                  Connection References (1):
                    - Logical Name: new_shared_sql_wf1
                      Connection Reference ID: Not Found
                      Provider: shared_sql
                      Connection ID: Not Found

                {rule}

                Flow: Idle
                  ID: wf-2
                  Connection References: None
                {rule}

                === SUMMARY ===
                Total Flows: 2
                Total Connection References: 1
            "};

        assert_eq!(render_to_string(OutputFormat::Vertical, &result).unwrap(), expected);
    }
}
