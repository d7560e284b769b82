// src/main.rs
// =============================================================================
// Entry point of the workflow-sync CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG, or info / debug with --verbose)
// 3. Run the sync, or only the extraction for `extract`
// 4. Exit with the right code:
//      0 = sync finished (or extraction written)
//      1 = declined, no usable listing, failed extraction,
//          or a failed file with --strict
//      2 = unexpected error (e.g. the HTTP client could not be built)
// =============================================================================

mod cli;
mod config;
mod error;
mod instructions;
mod prompt;
mod remote;
mod sync;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ExtractArgs, SyncArgs};
use prompt::StdinConfirmer;
use remote::{GithubLister, HttpFetcher};
use sync::SyncOrchestrator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout is for the instructions and progress lines
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Some(Commands::Extract(args)) => handle_extract(args).await,
        None => handle_sync(cli.sync).await,
    }
}

async fn handle_sync(args: SyncArgs) -> Result<i32> {
    let config = args.into_config();

    let fetcher = HttpFetcher::new().context("could not set up HTTP")?;
    let lister = GithubLister::new(fetcher.clone());

    let mut sync = SyncOrchestrator::new(
        config,
        Box::new(fetcher),
        Box::new(lister),
        Box::new(StdinConfirmer),
    );

    match sync.run().await {
        Ok(report) => {
            debug!(
                copied = report.copied(),
                failed = report.failed(),
                "sync finished"
            );
            Ok(report.exit_code(sync.config().strict))
        }
        Err(e) => {
            debug!(error = %e, "sync stopped");
            Ok(e.exit_code())
        }
    }
}

async fn handle_extract(args: ExtractArgs) -> Result<i32> {
    let config = args.into_config();

    match instructions::write_section(&config).await {
        Ok(path) => {
            println!("{}", format!("Wrote instructions: {}", path.display()).green());
            Ok(0)
        }
        Err(e) => {
            println!("{} {}", "Could not extract local instructions:".red(), e);
            Ok(1)
        }
    }
}
