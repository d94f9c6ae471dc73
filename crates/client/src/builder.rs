//! Builder pattern for constructing a [`Client`].

use std::time::Duration;

use ck_domain::config::{Config, ConfigSeverity};
use ck_domain::error::{Error, Result};
use ck_rest::{Credential, RestClient};

use crate::client::Client;

/// Fluent builder for [`Client`].
///
/// # Example
///
/// ```rust,no_run
/// # use ck_client::ClientBuilder;
/// # fn main() -> ck_domain::Result<()> {
/// let client = ClientBuilder::new()
///     .token("my-bot-token")
///     .request_timeout(std::time::Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    credential: Option<Credential>,
    config: Config,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            credential: None,
            config: Config::default(),
        }
    }

    // ── Credential ───────────────────────────────────────────────────

    /// Set the bot token.  When unset, `build` reads the variable named
    /// by `api.token_env` (default `CK_BOT_TOKEN`).
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::new(token));
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Replace the whole configuration (e.g. loaded from TOML).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Override the REST base URL (proxies, tests).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.api.user_agent = ua.into();
        self
    }

    /// Deadline for each REST request (default 15s).
    pub fn request_timeout(mut self, d: Duration) -> Self {
        self.config.api.timeout_ms = d.as_millis() as u64;
        self
    }

    /// Deadline for opening the gateway socket (default 10s).
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.config.gateway.connect_timeout_ms = d.as_millis() as u64;
        self
    }

    /// Build the [`Client`].  Configuration errors are fatal; warnings
    /// are logged.
    pub fn build(self) -> Result<Client<RestClient>> {
        for issue in self.config.validate() {
            match issue.severity {
                ConfigSeverity::Error => return Err(Error::Config(issue.to_string())),
                ConfigSeverity::Warning => tracing::warn!(issue = %issue, "config warning"),
            }
        }

        let credential = match self.credential {
            Some(c) => c,
            None => Credential::from_env(&self.config.api.token_env)?,
        };

        let rest = RestClient::new(&self.config.api, credential)?;
        Ok(Client::from_parts(rest, &self.config.gateway))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
