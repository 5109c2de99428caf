//! Deployment settings file for importing the package into another
//! environment. Connection ids are left blank for the target environment.

use crate::config::ConnectionReferenceSettings;
use crate::core::{NamingPolicy, Workflow};
use crate::errors::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_OUTPUT: &str = "deploymentsettings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentSettings {
    pub environment_variables: Vec<serde_json::Value>,
    pub connection_references: Vec<DeploymentReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentReference {
    pub logical_name: String,
    pub connection_id: String,
    pub connector_id: String,
}

/// One entry per distinct expected logical name, sorted by name. Providers
/// without a mapping get an empty connector id.
pub fn build_settings(
    workflows: &[Workflow],
    settings: &ConnectionReferenceSettings,
) -> DeploymentSettings {
    let policy = NamingPolicy::new(settings.prefix.clone());
    let mut entries: BTreeMap<String, String> = BTreeMap::new();

    for workflow in workflows {
        for provider in workflow.providers() {
            let connector_id = settings
                .mapping_for(&provider)
                .map(|m| m.connector_id.clone())
                .unwrap_or_default();
            entries
                .entry(policy.logical_name(&provider, &workflow.id))
                .or_insert(connector_id);
        }
    }

    DeploymentSettings {
        environment_variables: Vec::new(),
        connection_references: entries
            .into_iter()
            .map(|(logical_name, connector_id)| DeploymentReference {
                logical_name,
                connection_id: String::new(),
                connector_id,
            })
            .collect(),
    }
}

/// Write the pretty-printed settings to `output`.
pub fn generate(
    workflows: &[Workflow],
    settings: &ConnectionReferenceSettings,
    output: &Path,
) -> Result<DeploymentSettings> {
    let document = build_settings(workflows, settings);
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(output, json)?;
    info!(
        "Generated deployment settings with {} connection references: {}",
        document.connection_references.len(),
        output.display()
    );
    Ok(document)
}
