//! WordPress Sync Configuration Tool
//!
//! Validates a WordPress installation and manages its cached pull/push configuration

// wpsync/src/main.rs
mod cache;
mod config;
mod errors;
mod session;
mod utils;

use anyhow::{Context, Result};
use cache::ConfigStore;
use clap::Parser;
use clap::error::ErrorKind;
use config::Mode;
use config::settings::Settings;
use errors::AppError;
use session::{LineConsole, Session};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: wpsync [mode] [path-to-wordpress]\nmode: [pull | push]";

#[derive(Parser, Debug)]
#[command(name = "wpsync")]
#[command(about = "Configure WordPress pull/push synchronization", version)]
struct Cli {
    /// Sync direction: pull or push (case-insensitive)
    mode: String,

    /// Path to the WordPress installation (defaults to the directory of this executable)
    #[arg(allow_hyphen_values = true)]
    base_dir: Option<String>,

    /// Ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    extra: Vec<String>,
}

/// Main entry point for the configuration tool
fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            tracing::debug!(error = %e, "argument parsing failed");
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run_app(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<AppError>() {
            Some(app_err) if app_err.is_usage() => {
                println!("Fatal: {}", app_err);
                println!("{}", USAGE);
                ExitCode::FAILURE
            }
            _ => {
                eprintln!("❌ Error: {:?}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_app(cli: Cli) -> Result<()> {
    if !cli.extra.is_empty() {
        tracing::debug!(extra = ?cli.extra, "ignoring extra arguments");
    }

    // An unknown mode is a usage error even when the default directory cannot be resolved.
    cli.mode.parse::<Mode>()?;

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => utils::wordpress::default_base_dir()
            .context("Failed to resolve the default WordPress directory")?,
    };

    let mut session = Session::new(&cli.mode, base_dir)?;

    let settings = Settings::from_env().context("Failed to load settings")?;
    let store = ConfigStore::new(&settings.config_root);
    let mut console = LineConsole::stdio();

    session::run_session_flow(&mut session, &store, &mut console, settings.retry_policy)
        .context("Configuration session failed")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
