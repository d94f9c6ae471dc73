//! Reference bot for cordkit.
//!
//! Logs in, prints every gateway frame it receives, and reconnects with
//! jittered back-off whenever the gateway drops it.  Ctrl-C closes the
//! connection cleanly.
//!
//! Usage:
//!   CK_BOT_TOKEN=secret ck-hello-bot
//!
//! Env vars:
//!   CK_CONFIG         path to the TOML config (default: "cordkit.toml")
//!   CK_BOT_TOKEN      bot token (the name is configurable via `api.token_env`)
//!   CK_GREET_CHANNEL  if set, post a greeting to this channel after login
//!   CK_LOG_FORMAT     "json" for structured logs
//!   RUST_LOG          log filter (default: "info")

use anyhow::Context;
use ck_client::{Client, ClientBuilder, CloseReason, Frame, GatewayEvent, GatewayEvents, RestClient};
use ck_domain::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::var("CK_CONFIG").unwrap_or_else(|_| "cordkit.toml".into());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {config_path}"))?;
    tracing::info!(path = %config_path, api = %config.api.base_url, "config loaded");

    let client = ClientBuilder::new().config(config).build()?;

    let me = client.login().await?;
    tracing::info!(user_id = %me.id, username = %me.username, "logged in");

    if let Ok(channel_id) = std::env::var("CK_GREET_CHANNEL") {
        match client
            .send_message(&channel_id, &format!("Hello from {}!", me.username))
            .await
        {
            Ok(msg) => tracing::info!(message_id = %msg.id, channel_id = %channel_id, "greeting sent"),
            Err(e) => tracing::warn!(error = %e, channel_id = %channel_id, "greeting failed"),
        }
    }

    tokio::select! {
        result = run(&client) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT, shutting down"),
    }

    client.shutdown().await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CK_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Pump events until the connection ends, then reconnect.  Returns when
/// the connection was shut down locally, or errors once the reconnect
/// budget is spent.
async fn run(client: &Client<RestClient>) -> anyhow::Result<()> {
    let mut events = client
        .events()
        .context("login did not produce an event receiver")?;
    let backoff = client.reconnect_backoff().clone();

    loop {
        match pump(&mut events).await {
            Some(CloseReason::Shutdown) => return Ok(()),
            Some(reason) => tracing::warn!(
                code = ?reason.code(),
                reason = %reason.reason(),
                "gateway connection lost"
            ),
            None => tracing::warn!("gateway event channel ended"),
        }

        let mut attempt = 0;
        events = loop {
            if backoff.should_give_up(attempt) {
                anyhow::bail!("giving up after {attempt} reconnect attempts");
            }
            let delay = backoff.delay_for_attempt(attempt);
            tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
            tokio::time::sleep(delay).await;

            match client.reconnect().await {
                Ok(events) => break events,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "reconnect failed");
                    attempt += 1;
                }
            }
        };
    }
}

/// Log frames until the close event arrives.
async fn pump(events: &mut GatewayEvents) -> Option<CloseReason> {
    while let Some(event) = events.recv().await {
        match event {
            GatewayEvent::Frame(Frame::Text(text)) => {
                tracing::info!(len = text.len(), frame = %text, "text frame");
            }
            GatewayEvent::Frame(Frame::Binary(data)) => {
                tracing::info!(len = data.len(), "binary frame");
            }
            GatewayEvent::Closed(reason) => return Some(reason),
        }
    }
    None
}
