//! `ck-client`: the bot-facing facade of cordkit.
//!
//! A [`Client`] pairs a REST client with a single gateway session.
//! `login()` resolves the bot's identity, looks up the gateway URL and
//! opens the socket; frames then arrive on the receiver from
//! [`Client::events`].  Sending messages and editing the profile go
//! through the same client and never disturb the live connection.
//!
//! ```rust,no_run
//! # async fn run() -> ck_domain::Result<()> {
//! let client = ck_client::ClientBuilder::new().token("my-bot-token").build()?;
//! let me = client.login().await?;
//! println!("logged in as {}", me.username);
//! if let Some(mut events) = client.events() {
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;

pub use builder::ClientBuilder;
pub use client::Client;

pub use ck_gateway::{CloseReason, Frame, GatewayEvent, GatewayEvents, ReconnectBackoff, SessionState};
pub use ck_rest::{BotApi, Credential, RestClient};
