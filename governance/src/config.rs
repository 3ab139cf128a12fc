//! Engine configuration with TOML file support.

use crate::ballot::WeightPolicy;
use crate::error::{GovernanceError, Result};
use fundgov_types::{Name, Symbol};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Static configuration of a governance deployment.
///
/// Runtime parameters (threshold, fees, approver) live in the store and are
/// changed through `set_params`; this file only fixes what never changes
/// while the engine runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Administrator identity, and the account that receives listing fees.
    #[serde(default = "default_governance_account")]
    pub governance_account: Name,

    /// The single supported token, written as `"<precision>,<CODE>"`.
    #[serde(default = "default_token")]
    pub token: Symbol,

    /// When ballot weights are measured.
    #[serde(default)]
    pub weight_policy: WeightPolicy,

    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_governance_account() -> Name {
    Name::new("fundgov").expect("literal is a valid name")
}

fn default_token() -> Symbol {
    Symbol::new("XPR", 4).expect("literal is a valid symbol")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./fundgov_data")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GovernanceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// LMDB map size in bytes.
    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            governance_account: default_governance_account(),
            token: default_token(),
            weight_policy: WeightPolicy::default(),
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
