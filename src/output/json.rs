use super::{OutputWriter, NO_FLOWS};
use crate::analysis::AnalysisResult;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonReport<'a> {
    solution_name: &'a str,
    analysis_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    summary: JsonSummary,
    flows: Vec<JsonFlow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonSummary {
    total_flows: usize,
    total_connection_references: usize,
    flows_with_connection_references: usize,
    flows_without_connection_references: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonFlow<'a> {
    flow_id: &'a str,
    flow_name: &'a str,
    connection_reference_count: usize,
    connection_references: Vec<JsonReference<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonReference<'a> {
    connection_reference_id: &'a str,
    logical_name: &'a str,
    provider: &'a str,
    connection_id: &'a str,
}

pub struct JsonWriter<W: Write> {
    writer: W,
    timestamp: Option<DateTime<Utc>>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            timestamp: None,
        }
    }

    /// Fix `AnalysisDate` instead of using the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_analysis(&mut self, result: &AnalysisResult) -> Result<()> {
        let summary = result.summary();
        let report = JsonReport {
            solution_name: &result.package_name,
            analysis_date: self
                .timestamp
                .unwrap_or_else(Utc::now)
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
            message: result.workflows.is_empty().then_some(NO_FLOWS),
            summary: JsonSummary {
                total_flows: summary.total_flows,
                total_connection_references: summary.total_references,
                flows_with_connection_references: summary.flows_with_references,
                flows_without_connection_references: summary.flows_without_references,
            },
            flows: result
                .workflows
                .iter()
                .map(|w| JsonFlow {
                    flow_id: &w.id,
                    flow_name: &w.name,
                    connection_reference_count: w.references.len(),
                    connection_references: w
                        .references
                        .iter()
                        .map(|r| JsonReference {
                            connection_reference_id: &r.reference_id,
                            logical_name: &r.logical_name,
                            provider: &r.provider,
                            connection_id: &r.connection_id,
                        })
                        .collect(),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ReferenceDetail, WorkflowAnalysis};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn render(result: &AnalysisResult) -> Value {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
            .write_analysis(result)
            .unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let result = AnalysisResult {
            package_name: "Pkg".into(),
            workflows: vec![WorkflowAnalysis {
                id: "wf-1".into(),
                name: "Orders".into(),
                references: vec![ReferenceDetail {
                    reference_id: "id-1".into(),
                    logical_name: "new_a".into(),
                    provider: "shared_sql".into(),
                    connection_id: "conn-1".into(),
                }],
            }],
        };

        assert_eq!(
            render(&result),
            json!({
                "SolutionName": "Pkg",
                "AnalysisDate": "2024-05-01T12:30:00Z",
                "Summary": {
                    "TotalFlows": 1,
                    "TotalConnectionReferences": 1,
                    "FlowsWithConnectionReferences": 1,
                    "FlowsWithoutConnectionReferences": 0
                },
                "Flows": [{
                    "FlowId": "wf-1",
                    "FlowName": "Orders",
                    "ConnectionReferenceCount": 1,
                    "ConnectionReferences": [{
                        "ConnectionReferenceId": "id-1",
                        "LogicalName": "new_a",
                        "Provider": "shared_sql",
                        "ConnectionId": "conn-1"
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_no_flows() {
        let value = render(&AnalysisResult {
            package_name: "Pkg".into(),
            workflows: vec![],
        });
        assert_eq!(value["Summary"]["TotalFlows"], 0);
        assert_eq!(value["Summary"]["TotalConnectionReferences"], 0);
        assert_eq!(value["Flows"], json!([]));
        assert_eq!(value["Message"], "No flows found in the solution.");
    }
}
