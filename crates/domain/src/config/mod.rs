mod api;
mod gateway;

pub use api::*;
pub use gateway::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Config {
    /// Parse a TOML document.  Missing sections and fields take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("parsing config: {e}")))
    }

    /// Load from a TOML file, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.api.base_url.is_empty() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "api.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        } else if !(self.api.base_url.starts_with("https://")
            || self.api.base_url.starts_with("http://"))
        {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "api.base_url".into(),
                message: "base_url must be an http(s) URL".into(),
            });
        } else if self.api.base_url.starts_with("http://") {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "api.base_url".into(),
                message: "plain http sends the bot token unencrypted".into(),
            });
        }

        if self.api.timeout_ms == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "api.timeout_ms".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        if self.api.token_env.is_empty() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "api.token_env".into(),
                message: "token_env must name an environment variable".into(),
            });
        }

        if self.gateway.connect_timeout_ms == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "gateway.connect_timeout_ms".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        let rc = &self.gateway.reconnect;
        if rc.backoff_factor.is_nan() || rc.backoff_factor < 1.0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "gateway.reconnect.backoff_factor".into(),
                message: "backoff_factor must be at least 1.0".into(),
            });
        }
        if rc.initial_delay_ms > rc.max_delay_ms {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "gateway.reconnect.initial_delay_ms".into(),
                message: "initial delay exceeds max_delay_ms and will be capped".into(),
            });
        }

        issues
    }
}
