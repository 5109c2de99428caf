//! Dependency analysis and removal of unused connection references.

use crate::core::{ProcessingStats, SharedConnectionReference, Workflow};
use crate::errors::Result;
use crate::flows;
use crate::references;
use crate::remote::DataverseClient;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Logical name to the names of the workflows binding it.
///
/// Lookups ignore ASCII case, matching how the platform treats logical names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    usage: BTreeMap<String, Vec<String>>,
}

impl DependencyMap {
    pub fn users(&self, logical_name: &str) -> Option<&[String]> {
        self.usage
            .get(&logical_name.to_lowercase())
            .map(Vec::as_slice)
    }

    pub fn is_used(&self, logical_name: &str) -> bool {
        self.users(logical_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// Lower-cased logical names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.usage.keys().map(String::as_str)
    }
}

/// Bindings with an empty logical name are ignored.
pub fn build_dependency_map(workflows: &[Workflow]) -> DependencyMap {
    let mut usage: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for workflow in workflows {
        for binding in workflow.bindings() {
            if binding.logical_name.is_empty() {
                continue;
            }
            usage
                .entry(binding.logical_name.to_lowercase())
                .or_default()
                .push(workflow.name.clone());
        }
    }
    DependencyMap { usage }
}

#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    /// Deleted, or would be deleted in dry-run.
    pub deleted: Vec<SharedConnectionReference>,
    pub failed: Vec<SharedConnectionReference>,
    /// In-use references with the number of workflows binding each.
    pub kept: Vec<(SharedConnectionReference, usize)>,
    pub stats: ProcessingStats,
}

impl CleanupReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (reference, count) in &self.kept {
            out.push_str(&format!(
                "[IN USE] '{}' used by {count} flow(s)\n",
                reference.logical_name
            ));
        }
        out.push_str("\n--- CLEANUP SUMMARY ---\n");
        out.push_str(&format!(
            "Connection References Deleted: {} (Errors: {})\n",
            self.stats.deleted, self.stats.deleted_errors
        ));
        out.push_str(&format!(
            "Connection References Kept (In Use): {}\n",
            self.kept.len()
        ));
        out.push_str(&format!("Total Errors: {}\n", self.stats.total_errors()));
        out
    }
}

/// Delete every reference in `package` that no workflow in `package` binds.
pub fn cleanup(client: &DataverseClient, package: &str, dry_run: bool) -> Result<CleanupReport> {
    info!("Starting cleanup for solution '{package}'");
    let references = references::list_in_package(client, package)?;
    info!("Found {} connection references in solution", references.len());

    let workflows = flows::list_workflows_in_package(client, package)?;
    info!("Found {} flows in solution", workflows.len());

    let dependencies = build_dependency_map(&workflows);
    info!("Found {} connection references in use by flows", dependencies.len());

    let mut report = CleanupReport::default();
    for reference in references {
        if let Some(users) = dependencies.users(&reference.logical_name) {
            let count = users.len();
            report.kept.push((reference, count));
            continue;
        }

        if dry_run {
            info!(
                "[DRY RUN] Would delete unused connection reference '{}' (ID: {})",
                reference.logical_name, reference.id
            );
            report.stats.deleted += 1;
            report.deleted.push(reference);
            continue;
        }

        match references::delete(client, &reference.id) {
            Ok(()) => {
                info!(
                    "Deleted unused connection reference '{}' (ID: {})",
                    reference.logical_name, reference.id
                );
                report.stats.deleted += 1;
                report.deleted.push(reference);
            }
            Err(e) => {
                error!(
                    "[ERROR] Failed to delete connection reference '{}': {e}",
                    reference.logical_name
                );
                report.stats.deleted_errors += 1;
                report.failed.push(reference);
            }
        }
    }

    Ok(report)
}
