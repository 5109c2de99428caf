use super::Session;
use crate::deployment::{self, DeploymentSettings};
use crate::flows;
use crate::formatting::OutputFormatter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn generate_deployment_settings(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    output: &Path,
) -> Result<DeploymentSettings> {
    let workflows = flows::list_workflows_in_package(session.client, solution)
        .with_context(|| format!("failed to list flows in solution '{solution}'"))?;

    let document = deployment::generate(&workflows, &session.config.connection_references, output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    writeln!(
        out,
        "{}",
        session.formatter.success(&format!(
            "Generated deployment settings with {} connection references: {}",
            document.connection_references.len(),
            output.display()
        ))
    )?;
    Ok(document)
}
