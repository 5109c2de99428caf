//! Connection reference reconciliation.
//!
//! For every distinct provider a workflow binds, make sure a shared reference
//! named by [`NamingPolicy::logical_name`] exists, points at the configured
//! connection and is a member of the package. Remote failures are logged and
//! counted; they never stop processing of other providers or workflows.

pub mod membership;

use crate::config::{ConnectionReferenceSettings, ProviderMapping};
use crate::core::{Binding, NamingPolicy, ProcessingStats, Workflow};
use crate::references::{self, NewReference};
use crate::remote::DataverseClient;
use membership::MembershipAdder;
use std::collections::BTreeSet;
use tracing::{error, info, warn};

pub use membership::{is_soft_component_type_error, MembershipOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    SkippedNoMapping,
    /// Created, or an existing record with the expected name was reused.
    Created { id: String },
    /// Connection id on the remote record was changed.
    Updated { id: String },
    UpToDate { id: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub workflow_id: String,
    pub provider: String,
    pub logical_name: String,
    pub outcome: ReconcileOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<ProviderOutcome>,
    pub stats: ProcessingStats,
}

pub struct Reconciler<'a> {
    client: &'a DataverseClient,
    settings: &'a ConnectionReferenceSettings,
    policy: NamingPolicy,
    package: &'a str,
    dry_run: bool,
    membership: MembershipAdder<'a>,
    stats: ProcessingStats,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        client: &'a DataverseClient,
        settings: &'a ConnectionReferenceSettings,
        package: &'a str,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            settings,
            policy: NamingPolicy::new(settings.prefix.clone()),
            package,
            dry_run,
            membership: MembershipAdder::new(client),
            stats: ProcessingStats::default(),
        }
    }

    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    pub fn reconcile_workflow(&mut self, workflow: &Workflow) -> Vec<ProviderOutcome> {
        let bindings = workflow.bindings();
        workflow
            .providers()
            .into_iter()
            .map(|provider| {
                let logical_name = self.policy.logical_name(&provider, &workflow.id);
                let outcome = self.reconcile_provider(workflow, &provider, &logical_name, &bindings);
                ProviderOutcome {
                    workflow_id: workflow.id.clone(),
                    provider,
                    logical_name,
                    outcome,
                }
            })
            .collect()
    }

    fn reconcile_provider(
        &mut self,
        workflow: &Workflow,
        provider: &str,
        expected: &str,
        bindings: &[Binding],
    ) -> ReconcileOutcome {
        let Some(mapping) = self.settings.mapping_for(provider) else {
            warn!(
                "[WARN] No connection mapping configured for provider '{provider}' (flow '{}')",
                workflow.name
            );
            return ReconcileOutcome::SkippedNoMapping;
        };

        let already_bound = bindings
            .iter()
            .any(|b| b.provider == provider && b.logical_name.eq_ignore_ascii_case(expected));
        if !already_bound {
            return self.create(workflow, provider, expected, mapping);
        }

        match references::find_by_logical_name(self.client, expected) {
            Ok(Some(existing)) => {
                if existing.connection_id.eq_ignore_ascii_case(&mapping.connection_id) {
                    info!("Connection reference '{expected}' is up to date");
                    return ReconcileOutcome::UpToDate { id: existing.id };
                }
                self.update_connection(&existing.id, expected, mapping)
            }
            Ok(None) => {
                info!("Connection reference '{expected}' is bound but missing remotely; creating it");
                self.create(workflow, provider, expected, mapping)
            }
            Err(e) => {
                error!("[ERROR] Failed to look up connection reference '{expected}': {e}");
                self.stats.updated_errors += 1;
                ReconcileOutcome::Failed
            }
        }
    }

    fn update_connection(
        &mut self,
        id: &str,
        logical_name: &str,
        mapping: &ProviderMapping,
    ) -> ReconcileOutcome {
        if self.dry_run {
            info!(
                "[DRY RUN] Would update connection reference '{logical_name}' to connection '{}'",
                mapping.connection_id
            );
            self.stats.updated += 1;
            return ReconcileOutcome::Updated { id: id.to_string() };
        }

        match references::update_connection_id(self.client, id, &mapping.connection_id) {
            Ok(()) => {
                info!(
                    "Updated connection reference '{logical_name}' to connection '{}'",
                    mapping.connection_id
                );
                self.stats.updated += 1;
                ReconcileOutcome::Updated { id: id.to_string() }
            }
            Err(e) => {
                error!("[ERROR] Failed to update connection reference '{logical_name}': {e}");
                self.stats.updated_errors += 1;
                ReconcileOutcome::Failed
            }
        }
    }

    fn create(
        &mut self,
        workflow: &Workflow,
        provider: &str,
        logical_name: &str,
        mapping: &ProviderMapping,
    ) -> ReconcileOutcome {
        let existing = match references::find_by_logical_name(self.client, logical_name) {
            Ok(existing) => existing,
            Err(e) => {
                error!("[ERROR] Failed to look up connection reference '{logical_name}': {e}");
                self.stats.created_errors += 1;
                return ReconcileOutcome::Failed;
            }
        };

        let id = match existing {
            Some(existing) => {
                info!("Connection reference '{logical_name}' already exists ({})", existing.id);
                existing.id
            }
            None if self.dry_run => {
                let id = uuid::Uuid::new_v4().to_string();
                info!(
                    "[DRY RUN] Would create connection reference '{logical_name}' for provider '{provider}' (flow '{}')",
                    workflow.name
                );
                id
            }
            None => {
                let new_reference = NewReference {
                    logical_name: logical_name.to_string(),
                    display_name: self.policy.display_name(provider, &workflow.id),
                    connection_id: mapping.connection_id.clone(),
                    connector_id: mapping.connector_id.clone(),
                };
                match references::create(self.client, &new_reference) {
                    Ok(id) => {
                        info!("Created connection reference '{logical_name}' ({id})");
                        id
                    }
                    Err(e) => {
                        error!("[ERROR] Failed to create connection reference '{logical_name}': {e}");
                        self.stats.created_errors += 1;
                        return ReconcileOutcome::Failed;
                    }
                }
            }
        };

        self.stats.created += 1;
        self.add_to_package(&id, logical_name);
        ReconcileOutcome::Created { id }
    }

    fn add_to_package(&mut self, id: &str, logical_name: &str) {
        if self.dry_run {
            info!("[DRY RUN] Would add '{logical_name}' to solution '{}'", self.package);
            self.stats.added_to_package += 1;
            return;
        }

        match self.membership.add(self.package, id, logical_name) {
            MembershipOutcome::Failed(e) => {
                error!("[ERROR] Failed to add '{logical_name}' to solution '{}': {e}", self.package);
                self.stats.added_to_package_errors += 1;
            }
            _ => {
                info!("Added '{logical_name}' to solution '{}'", self.package);
                self.stats.added_to_package += 1;
            }
        }
    }
}

/// Reconcile every workflow in the package.
pub fn create_references_for_package(
    client: &DataverseClient,
    workflows: &[Workflow],
    settings: &ConnectionReferenceSettings,
    package: &str,
    dry_run: bool,
) -> ReconcileReport {
    let mut reconciler = Reconciler::new(client, settings, package, dry_run);
    let outcomes = workflows
        .iter()
        .flat_map(|workflow| {
            info!("Processing flow '{}' ({})", workflow.name, workflow.id);
            reconciler.reconcile_workflow(workflow)
        })
        .collect();
    ReconcileReport {
        outcomes,
        stats: reconciler.stats(),
    }
}

/// Add references the workflows already bind, but which are not yet members
/// of the package.
pub fn add_existing_references(
    client: &DataverseClient,
    workflows: &[Workflow],
    package: &str,
    dry_run: bool,
) -> crate::errors::Result<ProcessingStats> {
    let members: BTreeSet<String> = references::list_in_package(client, package)?
        .into_iter()
        .map(|r| r.logical_name.to_lowercase())
        .collect();

    let bound: BTreeSet<String> = workflows
        .iter()
        .flat_map(Workflow::bindings)
        .map(|b| b.logical_name)
        .filter(|name| !name.is_empty())
        .collect();

    let adder = MembershipAdder::new(client);
    let mut stats = ProcessingStats::default();

    for name in bound.iter().filter(|n| !members.contains(&n.to_lowercase())) {
        let reference = match references::find_by_logical_name(client, name) {
            Ok(Some(reference)) => reference,
            Ok(None) => {
                warn!("[WARN] Connection reference '{name}' not found; cannot add it to '{package}'");
                continue;
            }
            Err(e) => {
                error!("[ERROR] Failed to look up connection reference '{name}': {e}");
                stats.added_to_package_errors += 1;
                continue;
            }
        };

        if dry_run {
            info!("[DRY RUN] Would add '{name}' to solution '{package}'");
            stats.added_to_package += 1;
            continue;
        }

        match adder.add(package, &reference.id, name) {
            MembershipOutcome::Failed(e) => {
                error!("[ERROR] Failed to add '{name}' to solution '{package}': {e}");
                stats.added_to_package_errors += 1;
            }
            _ => {
                info!("Added '{name}' to solution '{package}'");
                stats.added_to_package += 1;
            }
        }
    }

    Ok(stats)
}
