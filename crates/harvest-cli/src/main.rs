//! `harvest` — copies a range of Hacker News items into a SQL table.
//!
//! # Usage
//!
//! ```
//! harvest --driver sqlite --dsn items.db --min-id 1 --max-id 500000 \
//!   --user-agent "localhost:research:v0.0.1 (by you@example.com)"
//! harvest --config harvest.toml --concurrency 4
//! ```
//!
//! Exit status is 0 when every id was handled, 1 when any item or batch
//! failed or the run was interrupted, and 2 for configuration errors.

mod settings;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use harvest_core::ConfigError;
use harvest_http::{HttpSource, SourceConfig};
use harvest_ingest::{Pipeline, RunSummary};
use harvest_store_sqlite::SqliteStore;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

/// Every flag overrides the same key from the config file and `HARVEST_*`
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "harvest", version, about = "Bulk-ingest Hacker News items into SQL")]
pub struct Args {
  /// Path to a TOML config file. Defaults to `harvest.toml` if present.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Log every item, not just batches.
  #[arg(short, long)]
  pub verbose: bool,

  /// Store driver (only `sqlite` is supported).
  #[arg(long)]
  pub driver: Option<String>,

  /// Connection string for the driver; a database file path for sqlite.
  #[arg(long)]
  pub dsn: Option<String>,

  /// Destination table (default: hacker_news_items).
  #[arg(long)]
  pub table: Option<String>,

  /// `User-Agent` sent to the item API.
  #[arg(long)]
  pub user_agent: Option<String>,

  /// First id to ingest, inclusive.
  #[arg(long)]
  pub min_id: Option<i64>,

  /// Last id to ingest, inclusive.
  #[arg(long)]
  pub max_id: Option<i64>,

  /// Ids per batch (default: 100000).
  #[arg(long)]
  pub batch_size: Option<u64>,

  /// Most batches in flight at once (default: 8).
  #[arg(long)]
  pub concurrency: Option<u64>,

  /// Item endpoint; ids are fetched from `<url>/<id>.json`.
  #[arg(long, value_name = "URL")]
  pub item_base_url: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  let args = Args::parse();

  let default_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let result = run(&args).await;
  match &result {
    Ok(summary) => {
      println!("{summary}");
      if summary.is_success() {
        println!("done");
      }
    }
    Err(e) if is_config_error(e) => eprintln!("configuration error: {e:#}"),
    Err(e) => eprintln!("error: {e:#}"),
  }
  ExitCode::from(exit_status(&result))
}

// ─── Exit status ──────────────────────────────────────────────────────────────

const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

/// `0` for a fully successful run, [`EXIT_CONFIG`] when the run never started
/// because of configuration, [`EXIT_FAILED`] for everything else.
fn exit_status(result: &Result<RunSummary>) -> u8 {
  match result {
    Ok(summary) if summary.is_success() => 0,
    Ok(_) => EXIT_FAILED,
    Err(e) if is_config_error(e) => EXIT_CONFIG,
    Err(_) => EXIT_FAILED,
  }
}

fn is_config_error(e: &anyhow::Error) -> bool { e.downcast_ref::<ConfigError>().is_some() }

async fn run(args: &Args) -> Result<RunSummary> {
  let validated = settings::load(args)
    .map_err(|e| ConfigError::invalid("config", format!("{e:#}")))?
    .validate()?;

  let source = build_source(validated.source)?;

  let store = SqliteStore::open(&validated.store_path, validated.table)
    .await
    .with_context(|| {
      format!("failed to open store at {}", validated.store_path.display())
    })?;
  info!(
    path = %validated.store_path.display(),
    table = %store.table(),
    "store ready"
  );

  let pipeline = Pipeline::new(Arc::new(store), Arc::new(source), validated.pipeline)?;

  let cancel = pipeline.cancel_token();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received; finishing in-flight items");
      cancel.cancel();
    }
  });

  Ok(pipeline.run().await)
}

/// Client construction errors that stem from settings surface as
/// [`ConfigError`], so they exit with [`EXIT_CONFIG`].
fn build_source(config: SourceConfig) -> Result<HttpSource> {
  HttpSource::new(config).map_err(|e| match e {
    harvest_http::Error::Config(config) => anyhow::Error::from(config),
    other => anyhow::Error::from(other),
  })
}
