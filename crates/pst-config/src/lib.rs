//! pst-config
//!
//! Configuration for the paid-statements pipeline: connection and
//! transport credentials from the environment (fail-closed), and the
//! recipient routing table from a JSON file.
//!
//! Secrets never live in the routing file; production injects env vars
//! directly and the binary loads `.env` only as a dev convenience.

mod env;
mod routing;

pub use env::{AppConfig, SmtpConfig, SourceConfig};
pub use routing::{Routing, RoutingFile, UnroutedPolicy};

use std::fmt;
use std::path::PathBuf;

/// Configuration failures. All fatal: a run with partial credentials
/// or a partial routing table must not start.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    MissingEnv { key: &'static str },
    /// An environment variable is set but unusable (e.g. a port that
    /// is not a number).
    InvalidEnv { key: &'static str, raw: String },
    /// The routing file could not be read.
    RoutingIo { path: PathBuf, message: String },
    /// The routing file could not be parsed or failed validation.
    RoutingInvalid { message: String },
    /// The SQL query file could not be read.
    QueryIo { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEnv { key } => {
                write!(f, "missing required environment variable {key}")
            }
            ConfigError::InvalidEnv { key, raw } => {
                write!(f, "environment variable {key} has invalid value '{raw}'")
            }
            ConfigError::RoutingIo { path, message } => {
                write!(f, "cannot read routing file {}: {message}", path.display())
            }
            ConfigError::RoutingInvalid { message } => {
                write!(f, "invalid routing file: {message}")
            }
            ConfigError::QueryIo { path, message } => {
                write!(f, "cannot read query file {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
