//! Recipient routing table.
//!
//! Injected configuration, not a lookup table baked into code: every
//! group key's recipients come from a JSON file, the master report has
//! a reserved destination, and an unmapped key is governed by an
//! explicit policy — never a silent no-op, because an unrouted report
//! is a report nobody receives.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What to do with a group whose key has no explicit route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnroutedPolicy {
    /// Fail the run before any dispatch.
    Reject,
    /// Route to the configured catch-all list (logged downstream).
    CatchAll,
}

/// On-disk shape of the routing file.
///
/// ```json
/// {
///   "policy": "reject",
///   "master": ["finance@example.com"],
///   "routes": { "PM": ["pm-team@example.com"] },
///   "catch_all": ["ops@example.com"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingFile {
    #[serde(default = "default_policy")]
    pub policy: UnroutedPolicy,
    pub master: Vec<String>,
    pub routes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub catch_all: Vec<String>,
}

fn default_policy() -> UnroutedPolicy {
    UnroutedPolicy::Reject
}

/// Validated routing table.
#[derive(Debug, Clone)]
pub struct Routing {
    policy: UnroutedPolicy,
    master: Vec<String>,
    routes: BTreeMap<String, Vec<String>>,
    catch_all: Vec<String>,
}

impl Routing {
    pub fn load(path: &Path) -> Result<Routing, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::RoutingIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Routing, ConfigError> {
        let file: RoutingFile =
            serde_json::from_str(raw).map_err(|e| ConfigError::RoutingInvalid {
                message: e.to_string(),
            })?;
        Self::validate(file)
    }

    fn validate(file: RoutingFile) -> Result<Routing, ConfigError> {
        if file.master.is_empty() {
            return Err(ConfigError::RoutingInvalid {
                message: "master recipient list is empty".to_string(),
            });
        }
        if file.policy == UnroutedPolicy::CatchAll && file.catch_all.is_empty() {
            return Err(ConfigError::RoutingInvalid {
                message: "policy is catch_all but catch_all list is empty".to_string(),
            });
        }
        for (key, recipients) in &file.routes {
            if recipients.is_empty() {
                return Err(ConfigError::RoutingInvalid {
                    message: format!("route '{key}' has an empty recipient list"),
                });
            }
        }

        Ok(Routing {
            policy: file.policy,
            master: file.master,
            routes: file.routes,
            catch_all: file.catch_all,
        })
    }

    pub fn policy(&self) -> UnroutedPolicy {
        self.policy
    }

    /// Explicit recipients for a group key, if mapped.
    pub fn recipients_for(&self, key: &str) -> Option<&[String]> {
        self.routes.get(key).map(Vec::as_slice)
    }

    /// Catch-all recipients (meaningful only under
    /// [`UnroutedPolicy::CatchAll`]).
    pub fn catch_all(&self) -> &[String] {
        &self.catch_all
    }

    /// Recipients of the combined master report.
    pub fn master(&self) -> &[String] {
        &self.master
    }
}
