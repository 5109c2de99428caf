use super::create_refs::create_for_workflows;
use super::update_flows::update_workflows;
use super::{dry_run_banner, Session};
use crate::core::ProcessingStats;
use crate::flows;
use anyhow::{Context, Result};
use std::io::Write;

/// Create references, then rewrite the flows, over one listing of the
/// solution. A single combined summary is printed.
pub fn process(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    dry_run: bool,
) -> Result<ProcessingStats> {
    dry_run_banner(session, out, dry_run)?;
    let mut workflows = flows::list_workflows_in_package(session.client, solution)
        .with_context(|| format!("failed to list flows in solution '{solution}'"))?;

    let mut stats = create_for_workflows(session, out, solution, &workflows, dry_run)?;
    writeln!(out)?;
    stats += update_workflows(session, out, &mut workflows, dry_run)?;

    session.summary(out, &stats)?;
    Ok(stats)
}
