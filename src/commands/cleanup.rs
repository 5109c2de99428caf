use super::{dry_run_banner, Session};
use crate::cleanup::{self, CleanupReport};
use anyhow::{Context, Result};
use std::io::Write;

pub fn cleanup(
    session: &Session<'_>,
    out: &mut dyn Write,
    solution: &str,
    dry_run: bool,
) -> Result<CleanupReport> {
    dry_run_banner(session, out, dry_run)?;
    let report = cleanup::cleanup(session.client, solution, dry_run)
        .with_context(|| format!("cleanup of solution '{solution}' failed"))?;
    write!(out, "{}", report.render())?;
    Ok(report)
}
