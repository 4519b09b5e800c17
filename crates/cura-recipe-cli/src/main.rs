//! CLI entry point - the composition root.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cura_recipe_cli::handlers::{self, build::BuildArgs};
use cura_recipe_cli::{Cli, CliConfig, CliError, Commands, bootstrap};

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(&CliConfig::new(cli.descriptor))?;

    match command {
        Commands::Inspect => handlers::inspect::execute(&ctx)?,
        Commands::Options { overrides } => handlers::options::execute(&ctx, &overrides)?,
        Commands::Propagate { overrides } => handlers::propagate::execute(&ctx, &overrides)?,
        Commands::Env { overrides, format } => handlers::env::execute(&ctx, &overrides, format)?,
        Commands::Generate {
            overrides,
            metadata,
            output_dir,
        } => handlers::generate::execute(&ctx, &overrides, &metadata, &output_dir)?,
        Commands::Launchers {
            overrides,
            template,
            targets,
            output_dir,
        } => handlers::launchers::execute(&ctx, &overrides, &template, &targets, &output_dir)?,
        Commands::Build {
            overrides,
            metadata,
            source_dir,
            build_dir,
            output_dir,
            build_type,
            install_prefix,
            jobs,
            dry_run,
        } => {
            let args = BuildArgs {
                overrides,
                metadata,
                source_dir,
                build_dir,
                output_dir,
                build_type,
                install_prefix,
                jobs,
                dry_run,
            };
            handlers::build::execute(&ctx, args)?;
        }
        Commands::Status { output_dir } => handlers::status::execute(&output_dir)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load environment variables before clap reads `env = ...` defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_err = CliError::from_anyhow(&err);
            eprintln!("Error: {cli_err}");
            ExitCode::from(cli_err.exit_code())
        }
    }
}
