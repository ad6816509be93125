//! n - one command for every Node package manager
//!
//! Entry point for the n CLI application.

use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches};
use tracing::debug;

use n_pm::cli::{Cli, Commands, ScriptArgs};
use n_pm::commands;
use n_pm::config::{load_config, Config};
use n_pm::context::Project;
use n_pm::error::{exit_code, NError};
use n_pm::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(err) => {
            if let Some(n_err) = err.downcast_ref::<NError>() {
                eprintln!("Error: {n_err}");
                return ExitCode::from(n_err.exit_code() as u8);
            }
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code::GENERAL_ERROR as u8)
        }
    }
}

async fn run() -> Result<i32> {
    let cli = parse_cli().await;

    if let Some(shell) = cli.completions {
        Cli::generate_completions(shell);
        return Ok(exit_code::SUCCESS);
    }

    logging::init(cli.debug);
    debug!(version = env!("CARGO_PKG_VERSION"), ?cli, "Starting");

    let cwd = env::current_dir().context("Failed to read current directory")?;

    // Script flags are validated before any filesystem work.
    let script = match &cli.command {
        Some(Commands::Script(words)) => {
            Some(ScriptArgs::parse_from_raw(words).unwrap_or_else(|e| e.exit()))
        }
        _ => None,
    };

    if let Some(Commands::Init { pm }) = &cli.command {
        return commands::init(&cwd, (*pm).into(), cli.dry_run).await;
    }

    let config = if cli.no_config {
        Config::default()
    } else {
        load_config(cli.config.as_deref(), &cwd).await?
    };

    let project = Project::load(&cwd, cli.manager_override(), &config)
        .await
        .context("Failed to detect package manager")?;
    debug!(manager = %project.detection(), cwd = %cwd.display(), "Resolved project");

    let dry_run = cli.dry_run;
    match cli.command {
        None => commands::install(&project, Vec::new(), Vec::new(), dry_run).await,
        Some(Commands::Install(args)) => {
            let flags = args.flags();
            commands::install(&project, args.deps, flags, dry_run).await
        }
        Some(Commands::Reinstall { with_lock }) => {
            commands::reinstall(&project, &config, with_lock, dry_run).await
        }
        Some(Commands::Uninstall { deps }) => commands::uninstall(&project, deps, dry_run).await,
        Some(Commands::Switch { pm }) => {
            commands::switch(&project, &config, pm.into(), dry_run).await
        }
        Some(Commands::Init { .. }) => Ok(exit_code::SUCCESS),
        Some(Commands::Clean) => commands::clean(&project, &config, dry_run).await,
        Some(Commands::Scan { dir, install, dev }) => {
            commands::scan(&project, &config, dir.as_deref(), install, dev, dry_run).await
        }
        Some(Commands::List) => commands::list(&project),
        Some(Commands::Script(_)) => match script {
            Some(script) => commands::run_script(&project, &config, &script, dry_run).await,
            None => Ok(exit_code::SUCCESS),
        },
    }
}

/// Parse arguments; a help request also lists the project's scripts.
async fn parse_cli() -> Cli {
    let args: Vec<OsString> = env::args_os().collect();
    let mut cmd = Cli::command();

    if wants_help(&args) {
        if let Some(listing) = scripts_listing().await {
            cmd = cmd.after_help(listing);
        }
    }

    let matches = cmd.get_matches_from(args);
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn wants_help(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|a| *a != "--")
        .any(|a| a == "-h" || a == "--help")
}

async fn scripts_listing() -> Option<String> {
    let cwd = env::current_dir().ok()?;
    let project = Project::load(&cwd, None, &Config::default()).await.ok()?;
    let listing = commands::scripts_help(project.registry());
    (!listing.is_empty()).then_some(listing)
}
