//! review-gate CLI

mod cli;

use clap::{Parser, Subcommand};
use cli::{CommandContext, MergeOptions, RemindOptions};
use review_gate::config::Overrides;
use review_gate::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Exit code for configuration errors detected at startup
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "review-gate")]
#[command(about = "Merge gate and reviewer reminders for GitHub pull requests")]
#[command(version)]
struct Cli {
    /// Repository owner (overrides REVIEW_GATE_OWNER)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Repository name (overrides REVIEW_GATE_REPO)
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every open PR that passes the gate
    Merge {
        /// Evaluate and report without merging, commenting, or notifying
        #[arg(long)]
        dry_run: bool,

        /// Announce merges to the configured notifier
        #[arg(long)]
        notify: bool,

        /// Do not prune old merge notices
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Remind requested reviewers on every open PR
    Remind {
        /// Report without posting or deleting comments
        #[arg(long)]
        dry_run: bool,

        /// Do not expire old reminders
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Print the verdict for one open PR without acting on it
    Check {
        /// Pull request number
        number: u64,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "review_gate=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = Overrides {
        owner: cli.owner.clone(),
        repo: cli.repo.clone(),
        notify: matches!(cli.command, Commands::Merge { notify: true, .. }),
    };

    let ctx = match CommandContext::new(cli.config.as_deref(), &overrides) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let result = match cli.command {
        Commands::Merge {
            dry_run,
            no_cleanup,
            ..
        } => cli::run_merge(&ctx, &MergeOptions { dry_run, no_cleanup }).await,
        Commands::Remind {
            dry_run,
            no_cleanup,
        } => cli::run_remind(&ctx, &RemindOptions { dry_run, no_cleanup }).await,
        Commands::Check { number } => {
            return match cli::run_check(&ctx, number).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    // Only startup validation affects the exit code of a pass
    if let Err(e) = result {
        report_aborted_pass(&e);
    }
    ExitCode::SUCCESS
}

fn report_aborted_pass(e: &Error) {
    error!(error = %e, "run aborted before processing pull requests");
}
