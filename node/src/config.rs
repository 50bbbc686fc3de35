//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use agora_governance::params::{DEFAULT_MAX_VOTING_PERIOD_SECS, DEFAULT_MIN_VOTING_PERIOD_SECS};
use agora_governance::GovernanceParams;
use agora_types::Principal;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for hosting one governance engine.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Initial admin as 64 hex characters. Required unless the engine is
    /// restored from a snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,

    /// Initial whitelist guardian as 64 hex characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_guardian: Option<String>,

    /// Shortest accepted voting period, in seconds.
    #[serde(default = "default_min_voting_period")]
    pub min_voting_period_secs: u64,

    /// Longest accepted voting period, in seconds.
    #[serde(default = "default_max_voting_period")]
    pub max_voting_period_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where engine snapshots are read from at startup and written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,

    /// Whether to collect Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_min_voting_period() -> u64 {
    DEFAULT_MIN_VOTING_PERIOD_SECS
}

fn default_max_voting_period() -> u64 {
    DEFAULT_MAX_VOTING_PERIOD_SECS
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The configured admin principal.
    pub fn admin_principal(&self) -> Result<Principal, NodeError> {
        let raw = self
            .admin
            .as_deref()
            .ok_or_else(|| NodeError::Config("admin is not set".to_string()))?;
        parse_principal("admin", raw)
    }

    /// The configured guardian, if any.
    pub fn guardian_principal(&self) -> Result<Option<Principal>, NodeError> {
        self.whitelist_guardian
            .as_deref()
            .map(|raw| parse_principal("whitelist_guardian", raw))
            .transpose()
    }

    pub fn params(&self) -> GovernanceParams {
        GovernanceParams {
            min_voting_period_secs: self.min_voting_period_secs,
            max_voting_period_secs: self.max_voting_period_secs,
        }
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Check every field that can be checked without touching the disk.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.params()
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        self.log_format()?;
        if let Some(raw) = &self.admin {
            parse_principal("admin", raw)?;
        }
        self.guardian_principal()?;
        Ok(())
    }
}

fn parse_principal(field: &str, raw: &str) -> Result<Principal, NodeError> {
    let principal: Principal = raw
        .parse()
        .map_err(|e| NodeError::Config(format!("{field}: {e}")))?;
    if principal.is_null() {
        return Err(NodeError::Config(format!("{field}: null principal")));
    }
    Ok(principal)
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            admin: None,
            whitelist_guardian: None,
            min_voting_period_secs: default_min_voting_period(),
            max_voting_period_secs: default_max_voting_period(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            snapshot_path: None,
            enable_metrics: false,
        }
    }
}
