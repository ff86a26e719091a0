//! pst entry point.
//!
//! This binary is intentionally thin: it loads configuration, sets up
//! tracing, wires the collaborators, and maps outcomes to exit codes
//! and the persistent run log. All pipeline semantics live in
//! pst-runtime.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use pst_config::{AppConfig, ConfigError, Routing};
use pst_dispatch::SmtpSender;
use pst_engine::ReportRow;
use pst_runtime::{Pipeline, RunError, RunLog, RunOutcome};
use pst_snapshot::SnapshotStore;
use pst_source::SqlSource;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pst")]
#[command(about = "Paid-statements reporting pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one full run: fetch, diff, dispatch, rotate.
    Run,

    /// Compute a run and print what it would report, without
    /// dispatching, writing snapshots, or rotating.
    Preview,

    /// Seed an empty previous snapshot so the first scheduled run can
    /// proceed. Refuses to touch an existing one.
    Init,
}

#[tokio::main]
async fn main() {
    // Dev convenience; production injects env vars directly.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let code = match cli.cmd {
        Commands::Run => cmd_run().await,
        Commands::Preview => fallible(cmd_preview().await),
        Commands::Init => fallible(cmd_init()),
    };
    std::process::exit(code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn fallible(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            1
        }
    }
}

/// One scheduled run. Success and failure both end in exactly one
/// run-log entry; a logger failure is reported but never masks the run
/// outcome or the exit code.
async fn cmd_run() -> i32 {
    // The log path must be known even when configuration fails, so the
    // failure itself still gets logged.
    let log_path =
        std::env::var("PST_RUN_LOG").unwrap_or_else(|_| "logs.txt".to_string());
    let run_log = RunLog::new(log_path);

    match execute_run().await {
        Ok(outcome) => {
            log_outcome(&outcome);
            if let Err(e) = run_log.record_success() {
                error!("run log write failed: {e}");
            }
            0
        }
        Err(run_error) => {
            error!(kind = run_error.kind(), "run failed: {run_error}");
            if let Err(e) = run_log.record_failure(&run_error) {
                error!("run log write failed: {e}");
            }
            1
        }
    }
}

async fn execute_run() -> std::result::Result<RunOutcome, RunError> {
    let config = AppConfig::from_env()?;
    let routing = Routing::load(&config.routes_path)?;
    let query = read_query(&config.query_path)?;

    let store = SnapshotStore::new(&config.snapshot_dir);
    let source = SqlSource::connect(&config.source.database_url).await?;
    let transport = SmtpSender::new(&config.smtp)?;

    let pipeline = Pipeline {
        source: &source,
        store: &store,
        transport: &transport,
        routing: &routing,
        spec: config.table.clone(),
    };

    pipeline
        .run(&query, &lookback_date(config.lookback_days))
        .await
}

async fn cmd_preview() -> Result<()> {
    let config = AppConfig::from_env()?;
    let routing = Routing::load(&config.routes_path)?;
    let query = read_query(&config.query_path)?;

    let store = SnapshotStore::new(&config.snapshot_dir);
    let source = SqlSource::connect(&config.source.database_url)
        .await
        .context("connect to statements database")?;
    // Preview never dispatches, but the pipeline still needs a wired
    // transport; constructing it also validates the SMTP config early.
    let transport = SmtpSender::new(&config.smtp)?;

    let pipeline = Pipeline {
        source: &source,
        store: &store,
        transport: &transport,
        routing: &routing,
        spec: config.table.clone(),
    };

    let preview = pipeline
        .preview(&query, &lookback_date(config.lookback_days))
        .await?;

    println!("new entries: {}", preview.new_entries);
    for report in &preview.reports {
        let data_rows = report
            .rows
            .iter()
            .filter(|r| matches!(r, ReportRow::Data(_)))
            .count();
        println!(
            "  {}: {} rows, {} subtotals",
            report.key,
            data_rows,
            report.subtotal_count()
        );
    }
    Ok(())
}

fn cmd_init() -> Result<()> {
    let dir = std::env::var("PST_SNAPSHOT_DIR").unwrap_or_else(|_| ".".to_string());
    let store = SnapshotStore::new(&dir);

    if store.seed_previous().context("seed previous snapshot")? {
        println!("seeded empty previous snapshot at {}", store.previous_path().display());
    } else {
        println!(
            "previous snapshot already exists at {}; nothing to do",
            store.previous_path().display()
        );
    }
    Ok(())
}

fn read_query(path: &Path) -> std::result::Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::QueryIo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Lower bound for the upstream query, formatted the way the feed's
/// date comparison expects.
fn lookback_date(days: i64) -> String {
    (Utc::now() - Duration::days(days))
        .format("%Y/%m/%d")
        .to_string()
}

fn log_outcome(outcome: &RunOutcome) {
    info!(
        new_entries = outcome.new_entries,
        groups = outcome.groups,
        group_artifacts = outcome.dispatch.group_artifacts,
        master_rows = outcome.dispatch.master_rows,
        rotated = outcome.rotated,
        "run succeeded"
    );
}
