use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "connref")]
#[command(
    about = "Inventory and rewire connection references used by cloud flows",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to .connref.toml in this or a parent directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct SolutionArg {
    /// Unique name of the solution
    #[arg(short, long = "solution", value_name = "NAME")]
    pub solution: String,
}

#[derive(Args, Debug, Clone)]
pub struct MutatingArgs {
    #[command(flatten)]
    pub target: SolutionArg,

    /// Report intended changes without modifying anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report flows and their connection references
    Analyze {
        #[command(flatten)]
        target: SolutionArg,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Vertical)]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create shared connection references for the flows in a solution
    CreateRefs(MutatingArgs),

    /// Point flows at the shared connection references
    UpdateFlows(MutatingArgs),

    /// Create references, then update flows
    Process(MutatingArgs),

    /// Write a deployment settings file for the solution
    GenerateDeploymentSettings {
        #[command(flatten)]
        target: SolutionArg,

        /// Output file
        #[arg(short, long, default_value = crate::deployment::DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Delete connection references no flow in the solution uses
    Cleanup(MutatingArgs),

    /// Add connection references that flows already use to the solution
    AddExistingRefs(MutatingArgs),

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}
