//! `ck-rest`: REST transport for the bot API.
//!
//! Provides the [`BotApi`] trait, the production [`RestClient`], the bot
//! [`Credential`] and the request DTOs.  Every call is a single
//! authenticated request: no retries, no shared mutable state, safe to
//! call concurrently with itself and with gateway activity.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ck_domain::config::ApiConfig;
//! use ck_rest::{BotApi, Credential, RestClient};
//!
//! # async fn example() -> ck_domain::Result<()> {
//! let client = RestClient::new(&ApiConfig::default(), Credential::from_env("CK_BOT_TOKEN")?)?;
//! let me = client.fetch_self().await?;
//! client.post_message("1234567890", &format!("hello from {}", me.username)).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod credential;
pub mod rest;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use api::BotApi;
pub use credential::Credential;
pub use rest::RestClient;
