use super::{dry_run_banner, Session};
use crate::core::{ProcessingStats, Workflow};
use crate::flows;
use crate::reconcile;
use anyhow::{Context, Result};
use std::io::Write;

pub(super) fn create_for_workflows(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    workflows: &[Workflow],
    dry_run: bool,
) -> Result<ProcessingStats> {
    session.heading(out, "=== CREATING CONNECTION REFERENCES ===")?;
    let report = reconcile::create_references_for_package(
        session.client,
        workflows,
        &session.config.connection_references,
        solution,
        dry_run,
    );
    Ok(report.stats)
}

pub fn create_refs(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    dry_run: bool,
) -> Result<ProcessingStats> {
    dry_run_banner(session, out, dry_run)?;
    let workflows = flows::list_workflows_in_package(session.client, solution)
        .with_context(|| format!("failed to list flows in solution '{solution}'"))?;

    let stats = create_for_workflows(session, out, solution, &workflows, dry_run)?;
    session.summary(out, &stats)?;
    Ok(stats)
}
