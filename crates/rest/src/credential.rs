//! Bot credential shared read-only by the REST client and the gateway.

use std::fmt;
use std::sync::Arc;

use ck_domain::error::{Error, Result};

/// An opaque bot token.  No local validation: a bad token only shows up as
/// an authentication failure from the platform.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: Arc<str>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }

    /// Read the token from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            Ok(_) => Err(Error::Config(format!("{var} is empty"))),
            Err(_) => Err(Error::Config(format!("{var} is not set"))),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"<redacted>").finish()
    }
}
