//! Read-only view of the workflows in a package and the references they bind.

use crate::core::{SharedConnectionReference, Workflow};
use crate::errors::Result;
use crate::flows;
use crate::references;
use crate::remote::DataverseClient;
use tracing::error;

pub const NOT_FOUND: &str = "Not Found";
pub const UNKNOWN: &str = "Unknown";
pub const NOT_SET: &str = "Not Set";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDetail {
    pub reference_id: String,
    pub logical_name: String,
    pub provider: String,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowAnalysis {
    pub id: String,
    pub name: String,
    pub references: Vec<ReferenceDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub package_name: String,
    pub workflows: Vec<WorkflowAnalysis>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total_flows: usize,
    pub total_references: usize,
    pub flows_with_references: usize,
    pub flows_without_references: usize,
}

impl AnalysisResult {
    pub fn summary(&self) -> AnalysisSummary {
        let with = self
            .workflows
            .iter()
            .filter(|w| !w.references.is_empty())
            .count();
        AnalysisSummary {
            total_flows: self.workflows.len(),
            total_references: self.workflows.iter().map(|w| w.references.len()).sum(),
            flows_with_references: with,
            flows_without_references: self.workflows.len() - with,
        }
    }
}

/// `(reference id, connection id)` shown for a lookup result.
pub fn describe_lookup(lookup: &Result<Option<SharedConnectionReference>>) -> (String, String) {
    let or = |value: &str, sentinel: &str| {
        if value.is_empty() {
            sentinel.to_string()
        } else {
            value.to_string()
        }
    };
    match lookup {
        Ok(Some(reference)) => (
            or(&reference.id, UNKNOWN),
            or(&reference.connection_id, NOT_SET),
        ),
        Ok(None) => (NOT_FOUND.to_string(), NOT_FOUND.to_string()),
        Err(_) => (UNKNOWN.to_string(), NOT_SET.to_string()),
    }
}

/// Analyse `workflows`, resolving each binding with `lookup`.
pub fn analyze_workflows<F>(package: &str, workflows: &[Workflow], mut lookup: F) -> AnalysisResult
where
    F: FnMut(&str) -> Result<Option<SharedConnectionReference>>,
{
    let workflows = workflows
        .iter()
        .map(|workflow| WorkflowAnalysis {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            references: workflow
                .bindings()
                .into_iter()
                .map(|binding| {
                    let found = lookup(&binding.logical_name);
                    if let Err(e) = &found {
                        error!(
                            "[ERROR] Failed to query connection reference '{}': {e}",
                            binding.logical_name
                        );
                    }
                    let (reference_id, connection_id) = describe_lookup(&found);
                    ReferenceDetail {
                        reference_id,
                        logical_name: binding.logical_name,
                        provider: binding.provider,
                        connection_id,
                    }
                })
                .collect(),
        })
        .collect();

    AnalysisResult {
        package_name: package.to_string(),
        workflows,
    }
}

/// List the package's workflows and look up every bound reference.
pub fn build_analysis(client: &DataverseClient, package: &str) -> Result<AnalysisResult> {
    let workflows = flows::list_workflows_in_package(client, package)?;
    Ok(analyze_workflows(package, &workflows, |logical_name| {
        if logical_name.is_empty() {
            return Ok(None);
        }
        references::find_by_logical_name(client, logical_name)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConnRefError;
    use crate::testkit::helpers;

    fn workflow(id: &str, bindings: &[(&str, &str, &str)]) -> Workflow {
        Workflow::from_record(&helpers::workflow_record(id, id, &helpers::client_data(bindings)))
            .unwrap()
    }

    #[test]
    fn test_sentinels() {
        let workflows = vec![workflow(
            "wf-1",
            &[
                ("a", "shared_sql", "found"),
                ("b", "shared_sql", "blank"),
                ("c", "shared_sql", "missing"),
                ("d", "shared_sql", "broken"),
            ],
        )];

        let result = analyze_workflows("Pkg", &workflows, |name| match name {
            "found" => Ok(Some(SharedConnectionReference {
                id: "id-1".into(),
                connection_id: "conn-1".into(),
                ..Default::default()
            })),
            "blank" => Ok(Some(SharedConnectionReference::default())),
            "missing" => Ok(None),
            _ => Err(ConnRefError::remote(500, "boom")),
        });

        let details: Vec<(&str, &str)> = result.workflows[0]
            .references
            .iter()
            .map(|r| (r.reference_id.as_str(), r.connection_id.as_str()))
            .collect();
        assert_eq!(
            details,
            vec![
                ("id-1", "conn-1"),
                (UNKNOWN, NOT_SET),
                (NOT_FOUND, NOT_FOUND),
                (UNKNOWN, NOT_SET),
            ]
        );
    }

    #[test]
    fn test_summary_counts() {
        let workflows = vec![
            workflow("wf-1", &[("a", "shared_sql", "x"), ("b", "shared_o365", "y")]),
            workflow("wf-2", &[]),
        ];
        let result = analyze_workflows("Pkg", &workflows, |_| Ok(None));
        assert_eq!(
            result.summary(),
            AnalysisSummary {
                total_flows: 2,
                total_references: 2,
                flows_with_references: 1,
                flows_without_references: 1,
            }
        );
    }
}
