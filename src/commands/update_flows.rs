use super::{dry_run_banner, Session};
use crate::core::{ProcessingStats, Workflow};
use crate::flows;
use anyhow::{Context, Result};
use std::io::Write;

pub(super) fn update_workflows(
    session: &Session<'_>,
    out: &mut dyn Write,
    workflows: &mut [Workflow],
    dry_run: bool,
) -> Result<ProcessingStats> {
    session.heading(out, "=== UPDATING FLOWS ===")?;
    let (_, stats) = flows::update_flows_in_package(
        session.client,
        workflows,
        &session.config.connection_references,
        dry_run,
    );
    Ok(stats)
}

pub fn update_flows(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    dry_run: bool,
) -> Result<ProcessingStats> {
    dry_run_banner(session, out, dry_run)?;
    let mut workflows = flows::list_workflows_in_package(session.client, solution)
        .with_context(|| format!("failed to list flows in solution '{solution}'"))?;

    let stats = update_workflows(session, out, &mut workflows, dry_run)?;
    session.summary(out, &stats)?;
    Ok(stats)
}
