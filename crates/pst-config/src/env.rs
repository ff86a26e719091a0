//! Environment-backed configuration.
//!
//! Required values fail closed: the run refuses to start rather than
//! limping along with partial credentials. Reads go through a lookup
//! function so tests never mutate the shared process environment.

use crate::ConfigError;
use pst_engine::TableSpec;
use std::env;
use std::path::PathBuf;

/// Data-source connection settings.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Full connection URL for the statements database.
    pub database_url: String,
}

/// SMTP transport settings. The authenticated username doubles as the
/// sender address.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Everything the binary needs to wire a run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub smtp: SmtpConfig,
    /// Parameterized SQL text to execute upstream.
    pub query_path: PathBuf,
    /// JSON routing table (group key -> recipients).
    pub routes_path: PathBuf,
    /// Directory holding previous.csv / current.csv.
    pub snapshot_dir: PathBuf,
    /// Prepend-style persistent run log.
    pub run_log_path: PathBuf,
    /// Lower-bound window for the upstream query, in days.
    pub lookback_days: i64,
    /// Column layout of the feed. Defaults to the production layout;
    /// overridable so a feed change is a config edit.
    pub table: TableSpec,
}

impl AppConfig {
    /// Read the full configuration from the process environment.
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    ///
    /// Credentials are required; paths and the lookback window have
    /// defaults matching the job's historical layout (files in the
    /// working directory, 180-day window).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ConfigError::MissingEnv { key }),
            }
        };
        let path_or = |key: &'static str, default: &str| -> PathBuf {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => PathBuf::from(v),
                _ => PathBuf::from(default),
            }
        };

        let port_raw = required("PST_SMTP_PORT")?;
        let port: u16 = port_raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            key: "PST_SMTP_PORT",
            raw: port_raw,
        })?;

        let lookback_days = match lookup("PST_LOOKBACK_DAYS") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: "PST_LOOKBACK_DAYS",
                    raw,
                })?
            }
            _ => 180,
        };

        let mut table = TableSpec::default();
        if let Some(raw) = lookup("PST_AMOUNT_COLUMNS") {
            if !raw.trim().is_empty() {
                table.amount_columns = raw
                    .split(',')
                    .map(|s| s.trim().parse::<usize>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ConfigError::InvalidEnv {
                        key: "PST_AMOUNT_COLUMNS",
                        raw,
                    })?;
            }
        }
        if let Some(raw) = lookup("PST_KEY_PREFIX_LEN") {
            if !raw.trim().is_empty() {
                table.prefix_len =
                    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                        key: "PST_KEY_PREFIX_LEN",
                        raw,
                    })?;
            }
        }

        Ok(AppConfig {
            source: SourceConfig {
                database_url: required("PST_DATABASE_URL")?,
            },
            smtp: SmtpConfig {
                host: required("PST_SMTP_HOST")?,
                port,
                username: required("PST_SMTP_USERNAME")?,
                password: required("PST_SMTP_PASSWORD")?,
            },
            query_path: path_or("PST_QUERY_FILE", "query.sql"),
            routes_path: path_or("PST_ROUTES_FILE", "routes.json"),
            snapshot_dir: path_or("PST_SNAPSHOT_DIR", "."),
            run_log_path: path_or("PST_RUN_LOG", "logs.txt"),
            lookback_days,
            table,
        })
    }
}
