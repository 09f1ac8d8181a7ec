//! Layered configuration: defaults, TOML file, `HARVEST_*` environment
//! variables, then command-line flags. Later layers win.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use harvest_core::{ConfigError, TableName, table::DEFAULT_TABLE};
use harvest_http::{DEFAULT_ITEM_BASE_URL, SourceConfig};
use harvest_ingest::PipelineConfig;
use serde::Deserialize;

use crate::Args;

/// Store drivers this build can talk to.
const SUPPORTED_DRIVERS: &[&str] = &["sqlite"];

// ─── Raw settings ─────────────────────────────────────────────────────────────

/// The merged configuration before validation. Mandatory keys are `Option`s
/// so that a missing one is reported by name.
#[derive(Debug, Deserialize)]
pub struct Settings {
  pub driver:                 Option<String>,
  pub dsn:                    Option<String>,
  pub table:                  String,
  pub user_agent:             Option<String>,
  pub min_id:                 Option<i64>,
  pub max_id:                 Option<i64>,
  pub batch_size:             u64,
  pub concurrency:            u64,
  pub item_base_url:          String,
  pub request_timeout_secs:   u64,
  pub query_retry_backoff_ms: u64,
}

/// Everything the binary needs, checked.
#[derive(Debug, Clone)]
pub struct Validated {
  pub store_path: PathBuf,
  pub table:      TableName,
  pub source:     SourceConfig,
  pub pipeline:   PipelineConfig,
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Load settings for `args`. A config file named with `--config` must exist;
/// the default `harvest.toml` is optional.
pub fn load(args: &Args) -> Result<Settings> {
  let file = match &args.config {
    Some(path) => File::from(path.clone()).required(true),
    None => File::from(Path::new("harvest.toml")).required(false),
  };

  let builder = defaults(Config::builder())?
    .add_source(file)
    .add_source(Environment::with_prefix("HARVEST").try_parsing(true));

  from_builder(overrides(builder, args)?)
}

fn defaults(
  builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>> {
  Ok(
    builder
      .set_default("table", DEFAULT_TABLE)?
      .set_default("batch_size", PipelineConfig::DEFAULT_BATCH_SIZE)?
      .set_default("concurrency", PipelineConfig::DEFAULT_CONCURRENCY as u64)?
      .set_default("item_base_url", DEFAULT_ITEM_BASE_URL)?
      .set_default("request_timeout_secs", 30_u64)?
      .set_default(
        "query_retry_backoff_ms",
        PipelineConfig::DEFAULT_QUERY_RETRY_BACKOFF.as_millis() as u64,
      )?,
  )
}

fn overrides(
  builder: ConfigBuilder<DefaultState>,
  args: &Args,
) -> Result<ConfigBuilder<DefaultState>> {
  Ok(
    builder
      .set_override_option("driver", args.driver.clone())?
      .set_override_option("dsn", args.dsn.clone())?
      .set_override_option("table", args.table.clone())?
      .set_override_option("user_agent", args.user_agent.clone())?
      .set_override_option("min_id", args.min_id)?
      .set_override_option("max_id", args.max_id)?
      .set_override_option("batch_size", args.batch_size)?
      .set_override_option("concurrency", args.concurrency)?
      .set_override_option("item_base_url", args.item_base_url.clone())?,
  )
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
  builder
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise configuration")
}

// ─── Validation ───────────────────────────────────────────────────────────────

impl Settings {
  pub fn validate(self) -> Result<Validated, ConfigError> {
    let driver = required(self.driver, "driver")?;
    if !SUPPORTED_DRIVERS.contains(&driver.as_str()) {
      return Err(ConfigError::invalid(
        "driver",
        format!("{driver:?} is not supported (expected one of {SUPPORTED_DRIVERS:?})"),
      ));
    }
    let dsn = required(self.dsn, "dsn")?;
    let table = TableName::parse(&self.table)?;
    let user_agent = required(self.user_agent, "user_agent")?;
    let min_id = self.min_id.ok_or(ConfigError::Missing("min_id"))?;
    let max_id = self.max_id.ok_or(ConfigError::Missing("max_id"))?;

    let concurrency = usize::try_from(self.concurrency)
      .ok()
      .filter(|&n| n > 0)
      .ok_or_else(|| ConfigError::invalid("concurrency", "must be at least 1"))?;
    if self.request_timeout_secs == 0 {
      return Err(ConfigError::invalid("request_timeout_secs", "must be at least 1"));
    }

    let pipeline = PipelineConfig {
      min_id,
      max_id,
      batch_size: self.batch_size,
      concurrency,
      query_retry_backoff: Duration::from_millis(self.query_retry_backoff_ms),
    };
    // Range checks live with the partitioner; run them before any work.
    harvest_ingest::partition(min_id, max_id, self.batch_size)?;

    Ok(Validated {
      store_path: PathBuf::from(dsn),
      table,
      source: SourceConfig {
        item_base_url: self.item_base_url,
        user_agent,
        timeout: Duration::from_secs(self.request_timeout_secs),
      },
      pipeline,
    })
  }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or(ConfigError::Missing(key))
}
