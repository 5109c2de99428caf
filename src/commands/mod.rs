//! CLI command implementations.
//!
//! Available commands:
//! - **analyze**: report flows and the references they bind
//! - **create-refs**: create shared references and add them to the solution
//! - **update-flows**: point flows at the shared references
//! - **process**: create-refs followed by update-flows
//! - **generate-deployment-settings**: write the settings file
//! - **cleanup**: delete references no flow uses
//! - **add-existing-refs**: add already-bound references to the solution
//! - **init**: write a starter configuration file
//!
//! Handlers receive a [`Session`] holding the client built at startup and
//! write their report to the given stdout handle; diagnostics go through
//! `tracing`.

pub mod add_existing;
pub mod analyze;
pub mod cleanup;
pub mod create_refs;
pub mod deployment_settings;
pub mod init;
pub mod process;
pub mod update_flows;

use crate::config::AppConfig;
use crate::core::ProcessingStats;
use crate::formatting::{ColoredFormatter, OutputFormatter};
use crate::remote::DataverseClient;
use std::io::Write;

pub use add_existing::add_existing_refs;
pub use analyze::analyze;
pub use cleanup::cleanup;
pub use create_refs::create_refs;
pub use deployment_settings::generate_deployment_settings;
pub use init::init_config;
pub use process::process;
pub use update_flows::update_flows;

/// Everything a remote command needs for one run.
pub struct Session<'a> {
    pub client: &'a DataverseClient,
    pub config: &'a AppConfig,
    pub formatter: &'a ColoredFormatter,
}

impl Session<'_> {
    fn heading(&self, out: &mut dyn Write, text: &str) -> std::io::Result<()> {
        writeln!(out, "{}", self.formatter.header(text))
    }

    fn summary(&self, out: &mut dyn Write, stats: &ProcessingStats) -> std::io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.formatter.header("--- SUMMARY ---"))?;
        writeln!(out, "{}", stats.render_summary(!self.formatter.is_enabled()))?;
        if stats.total_errors() > 0 {
            writeln!(
                out,
                "{}",
                self.formatter
                    .error(&format!("Completed with {} error(s)", stats.total_errors()))
            )?;
        }
        Ok(())
    }
}

fn dry_run_banner(session: &Session<'_>, out: &mut dyn Write, dry_run: bool) -> std::io::Result<()> {
    if dry_run {
        writeln!(
            out,
            "{}",
            session
                .formatter
                .warning("[DRY RUN] No changes will be made")
        )?;
    }
    Ok(())
}
