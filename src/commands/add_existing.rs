use super::{dry_run_banner, Session};
use crate::core::ProcessingStats;
use crate::{flows, reconcile};
use anyhow::{Context, Result};
use std::io::Write;

pub fn add_existing_refs(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    dry_run: bool,
) -> Result<ProcessingStats> {
    dry_run_banner(session, out, dry_run)?;
    let workflows = flows::list_workflows_in_package(session.client, solution)
        .with_context(|| format!("failed to list flows in solution '{solution}'"))?;

    session.heading(out, "=== ADDING EXISTING CONNECTION REFERENCES ===")?;
    let stats = reconcile::add_existing_references(session.client, &workflows, solution, dry_run)
        .with_context(|| format!("failed to list connection references in '{solution}'"))?;

    session.summary(out, &stats)?;
    Ok(stats)
}
