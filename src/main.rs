//! Ripple-Check main entry point
//!
//! This is the command-line interface for the Ripple-Check link validator.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ripple_check::config::{load_config_with_hash, Config};
use ripple_check::output::{print_statistics, write_csv, RunStatistics};
use ripple_check::report::ReportEvent;
use ripple_check::service::{Command, LinkCheckService, Response};
use ripple_check::{Session, SessionStatus};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Check: a single-page link validator
///
/// Ripple-Check extracts every link, image, stylesheet, and script referenced
/// by a page and checks that each one still answers. Interrupted runs are kept
/// in a local database and can be resumed.
#[derive(Parser, Debug)]
#[command(name = "ripple-check")]
#[command(version)]
#[command(about = "A single-page link validator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Check every reference on a page
    Check {
        /// The page to check
        page_url: String,

        /// Also write the outcomes as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Print outcomes as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Resume an interrupted run from the database
    Resume {
        /// Also write the outcomes as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Show the stored session
    Status,

    /// Write the stored session's outcomes as CSV
    Export {
        /// Destination file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let service = Arc::new(LinkCheckService::from_config(&config).context("failed to initialize")?);
    tracing::debug!("Using database {}", config.storage.database_path);

    match cli.command {
        CliCommand::Check {
            page_url,
            csv,
            json,
        } => handle_check(service, page_url, csv, json).await,
        CliCommand::Resume { csv } => handle_resume(service, csv).await,
        CliCommand::Status => handle_status(&service).await,
        CliCommand::Export { path } => handle_export(&service, &path).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_check=info,warn"),
            1 => EnvFilter::new("ripple_check=debug,info"),
            2 => EnvFilter::new("ripple_check=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `check`: extract, validate, and report
async fn handle_check(
    service: Arc<LinkCheckService>,
    page_url: String,
    csv: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let Response::Links(links) = service
        .dispatch(Command::ExtractLinks {
            page_url: page_url.clone(),
        })
        .await?
    else {
        anyhow::bail!("unexpected response to link extraction");
    };

    if links.is_empty() {
        tracing::warn!("No checkable links found on {}", page_url);
    }

    let watchers = spawn_watchers(&service);
    let response = service
        .dispatch(Command::StartValidation { page_url, links })
        .await;
    watchers.abort();

    let Response::Finished(session) = response? else {
        anyhow::bail!("unexpected response to validation start");
    };
    finish(&session, csv.as_deref(), json)
}

/// Handles `resume`: continue an interrupted run
async fn handle_resume(
    service: Arc<LinkCheckService>,
    csv: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let watchers = spawn_watchers(&service);
    let response = service.dispatch(Command::ResumeValidation).await;
    watchers.abort();

    match response? {
        Response::Resumed(Some(session)) => finish(&session, csv.as_deref(), false),
        Response::Resumed(None) => {
            println!("Nothing to resume");
            Ok(ExitCode::SUCCESS)
        }
        other => anyhow::bail!("unexpected response to resume: {:?}", other),
    }
}

/// Handles `status`: print the stored session summary
async fn handle_status(service: &LinkCheckService) -> anyhow::Result<ExitCode> {
    let Response::StoredSession(stored) = service.dispatch(Command::GetStoredSession).await? else {
        anyhow::bail!("unexpected response to status");
    };

    match stored {
        Some(session) => {
            println!("=== Stored Session ===\n");
            println!("  Id: {}", session.id);
            println!("  Page: {}", session.page_url);
            println!("  Status: {}", session.status);
            println!("  Progress: {} / {} links", session.completed_count, session.total());
            println!("  Started: {}", session.started_at.to_rfc3339());
            if let Some(completed_at) = session.completed_at {
                println!("  Finished: {}", completed_at.to_rfc3339());
            }
            if session.status == SessionStatus::Checking {
                println!("\nThis run was interrupted; use `ripple-check resume` to continue it.");
            }
        }
        None => println!("No stored session"),
    }
    Ok(ExitCode::SUCCESS)
}

/// Handles `export`: write the stored outcomes as CSV
async fn handle_export(service: &LinkCheckService, path: &Path) -> anyhow::Result<ExitCode> {
    let Response::Csv(csv) = service.dispatch(Command::ExportCsv).await? else {
        anyhow::bail!("unexpected response to export");
    };

    match csv {
        Some(document) => {
            std::fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✓ Outcomes exported to: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("No stored session to export");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Background tasks for the duration of a run: Ctrl-C cancels, progress is logged
struct Watchers {
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl Watchers {
    fn abort(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}

fn spawn_watchers(service: &Arc<LinkCheckService>) -> Watchers {
    let canceller = service.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling validation run");
            let _ = canceller.dispatch(Command::CancelValidation).await;
        }
    });

    let mut subscription = service.subscribe();
    let progress = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            match event {
                ReportEvent::Progress(snapshot) => {
                    if let Some(current) = snapshot.current {
                        tracing::info!(
                            "[{}/{}] {} {} ({})",
                            snapshot.completed,
                            snapshot.total,
                            current.category,
                            current.url,
                            current.description
                        );
                    }
                }
                ReportEvent::Complete { results } => {
                    tracing::debug!("Run complete with {} outcomes", results.len());
                }
            }
        }
    });

    Watchers {
        tasks: vec![interrupt, progress],
    }
}

/// Prints the run result, writes CSV if asked, and picks the exit code
fn finish(session: &Session, csv: Option<&Path>, json: bool) -> anyhow::Result<ExitCode> {
    let stats = RunStatistics::from_outcomes(&session.results);

    if json {
        println!("{}", serde_json::to_string_pretty(&session.results)?);
    } else {
        print_statistics(&session.page_url, &stats, &session.results);
        if session.status == SessionStatus::Cancelled {
            println!(
                "\nRun cancelled after {} of {} links",
                session.completed_count,
                session.total()
            );
        }
    }

    if let Some(path) = csv {
        write_csv(path, &session.page_url, &session.results, chrono::Utc::now())?;
    }

    if stats.broken() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
