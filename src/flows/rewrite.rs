//! Rewrite workflow bindings to point at the shared references.

use crate::config::ConnectionReferenceSettings;
use crate::core::{NamingPolicy, ProcessingStats, Workflow};
use crate::errors::Result;
use crate::remote::DataverseClient;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{error, info};

/// What happened to one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowUpdate {
    /// Nothing to change; no request was made.
    Unchanged,
    /// Bindings rewritten (or would be, in dry-run). Holds the replaced names.
    Updated(Vec<String>),
    Failed,
}

/// Overwrite the logical name of every binding whose provider is a key of
/// `targets`, then push the blob back unless `dry_run`.
///
/// Returns the non-empty names that were replaced. A failed PATCH is logged
/// and counted, not returned.
pub fn update_bindings(
    client: &DataverseClient,
    workflow: &mut Workflow,
    targets: &BTreeMap<String, String>,
    dry_run: bool,
    stats: &mut ProcessingStats,
) -> Vec<String> {
    let previous = workflow.client_data.rebind(targets);

    if dry_run {
        info!(
            "[DRY RUN] Would update flow '{}' ({}) to use {}",
            workflow.name,
            workflow.id,
            describe(targets)
        );
        stats.flows_updated += 1;
        return previous;
    }

    match push_client_data(client, workflow) {
        Ok(()) => {
            info!("Updated flow '{}' ({})", workflow.name, workflow.id);
            stats.flows_updated += 1;
        }
        Err(e) => {
            error!("[ERROR] Failed to update flow '{}': {e}", workflow.name);
            stats.flows_updated_errors += 1;
        }
    }
    previous
}

fn push_client_data(client: &DataverseClient, workflow: &Workflow) -> Result<()> {
    let body = json!({ "clientdata": workflow.client_data.to_compact_json()? });
    client.patch_json(&client.api_url(&format!("workflows({})", workflow.id)), body)?;
    Ok(())
}

fn describe(targets: &BTreeMap<String, String>) -> String {
    targets
        .iter()
        .map(|(provider, name)| format!("{provider} -> {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Providers of `workflow` that have a mapping and at least one binding not
/// already carrying the expected name, keyed to that name.
pub fn pending_targets(
    workflow: &Workflow,
    settings: &ConnectionReferenceSettings,
    policy: &NamingPolicy,
) -> BTreeMap<String, String> {
    let bindings = workflow.bindings();
    workflow
        .providers()
        .into_iter()
        .filter(|provider| settings.mapping_for(provider).is_some())
        .filter_map(|provider| {
            let expected = policy.logical_name(&provider, &workflow.id);
            let stale = bindings
                .iter()
                .filter(|b| b.provider == provider)
                .any(|b| !b.logical_name.eq_ignore_ascii_case(&expected));
            stale.then_some((provider, expected))
        })
        .collect()
}

/// Rewrite every workflow whose mapped bindings are stale.
pub fn update_flows_in_package(
    client: &DataverseClient,
    workflows: &mut [Workflow],
    settings: &ConnectionReferenceSettings,
    dry_run: bool,
) -> (Vec<FlowUpdate>, ProcessingStats) {
    let policy = NamingPolicy::new(settings.prefix.clone());
    let mut stats = ProcessingStats::default();
    let mut outcomes = Vec::with_capacity(workflows.len());

    for workflow in workflows.iter_mut() {
        let targets = pending_targets(workflow, settings, &policy);
        if targets.is_empty() {
            info!("Flow '{}' already uses the expected connection references", workflow.name);
            outcomes.push(FlowUpdate::Unchanged);
            continue;
        }

        let errors_before = stats.flows_updated_errors;
        let previous = update_bindings(client, workflow, &targets, dry_run, &mut stats);
        for name in &previous {
            info!("  replaced '{name}' in '{}'", workflow.name);
        }
        outcomes.push(if stats.flows_updated_errors > errors_before {
            FlowUpdate::Failed
        } else {
            FlowUpdate::Updated(previous)
        });
    }

    (outcomes, stats)
}
