use anyhow::{Context, Result};
use connref::cli::{parse_args, Commands};
use connref::commands::{self, Session};
use connref::config::load_config;
use connref::errors::ConnRefError;
use connref::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use connref::observability::init_logging;
use connref::remote::{auth, DataverseClient, HttpTransport};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

fn main() {
    let cli = parse_args();

    let formatting = if cli.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };
    let formatter = ColoredFormatter::new(formatting);
    init_logging(
        cli.verbosity,
        !cli.plain && formatter.is_enabled() && std::io::stderr().is_terminal(),
    );

    if let Err(error) = run(cli.config, cli.command, &formatter) {
        let cause = error.downcast_ref::<ConnRefError>();
        let code = cause
            .map(|e| format!("[{}] ", e.code()))
            .unwrap_or_default();
        eprintln!("{}", formatter.error(&format!("error: {code}{error:#}")));
        if let Some(hint) = cause.and_then(ConnRefError::hint) {
            eprintln!("{}", formatter.warning(&format!("hint: {hint}")));
        }
        std::process::exit(1);
    }
}

fn run(
    config_path: Option<PathBuf>,
    command: Commands,
    formatter: &ColoredFormatter,
) -> Result<()> {
    if let Commands::Init { force } = command {
        return commands::init_config(force);
    }

    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    let token = auth::acquire_token(&config.platform).context("failed to acquire access token")?;
    let transport = HttpTransport::new(&token)?;
    let client = DataverseClient::new(config.platform.dataverse_url.clone(), Box::new(transport));

    let session = Session {
        client: &client,
        config: &config,
        formatter,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Analyze {
            target,
            format,
            output,
        } => {
            commands::analyze(&session, &mut out, &target.solution, format, output.as_deref())?;
        }
        Commands::CreateRefs(args) => {
            commands::create_refs(&session, &mut out, &args.target.solution, args.dry_run)?;
        }
        Commands::UpdateFlows(args) => {
            commands::update_flows(&session, &mut out, &args.target.solution, args.dry_run)?;
        }
        Commands::Process(args) => {
            commands::process(&session, &mut out, &args.target.solution, args.dry_run)?;
        }
        Commands::GenerateDeploymentSettings { target, output } => {
            commands::generate_deployment_settings(&session, &mut out, &target.solution, &output)?;
        }
        Commands::Cleanup(args) => {
            commands::cleanup(&session, &mut out, &args.target.solution, args.dry_run)?;
        }
        Commands::AddExistingRefs(args) => {
            commands::add_existing_refs(&session, &mut out, &args.target.solution, args.dry_run)?;
        }
        Commands::Init { .. } => {}
    }

    out.flush()?;
    Ok(())
}
