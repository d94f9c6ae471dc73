//! The [`Client`] facade: one REST client plus one gateway session.

use ck_domain::config::GatewayConfig;
use ck_domain::error::{Error, Result};
use ck_domain::model::{Attachment, AvatarData, Embed, IntentsOptions, Message, User};
use ck_domain::resolver::EndpointResolver;
use ck_gateway::{CloseReason, GatewayEvents, GatewaySession, ReconnectBackoff, SessionState};
use ck_rest::BotApi;
use parking_lot::Mutex;
use tokio::sync::watch;

/// A bot client.
///
/// REST calls go straight to the API and never touch the gateway.  The
/// session is guarded by an async mutex so only one lifecycle operation
/// (`login`, `reconnect`, `shutdown`) runs at a time.
pub struct Client<A> {
    api: A,
    session: tokio::sync::Mutex<GatewaySession>,
    state: watch::Receiver<SessionState>,
    events: Mutex<Option<GatewayEvents>>,
    user: Mutex<Option<User>>,
    backoff: ReconnectBackoff,
}

impl<A> Client<A>
where
    A: BotApi + EndpointResolver,
{
    /// Assemble a client from an API implementation and gateway settings.
    pub fn from_parts(api: A, gateway: &GatewayConfig) -> Self {
        let session = GatewaySession::new(gateway);
        let state = session.watch_state();
        Self {
            api,
            session: tokio::sync::Mutex::new(session),
            state,
            events: Mutex::new(None),
            user: Mutex::new(None),
            backoff: ReconnectBackoff::from(&gateway.reconnect),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ── gateway lifecycle ────────────────────────────────────────────

    /// Resolve the bot's identity, then open the gateway.
    ///
    /// If identity resolution fails the gateway is not contacted.
    pub async fn login(&self) -> Result<User> {
        let user = self.api.fetch_self().await.map_err(|e| {
            tracing::warn!(error = %e, "identity resolution failed");
            Error::LoginFailed
        })?;
        tracing::info!(user_id = %user.id, username = %user.username, "identity resolved");

        let events = self.session.lock().await.open(&self.api).await?;
        *self.events.lock() = Some(events);
        *self.user.lock() = Some(user.clone());

        tracing::info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Take the event receiver for the current connection.
    pub fn events(&self) -> Option<GatewayEvents> {
        self.events.lock().take()
    }

    /// Resolve the endpoint again and open a new connection, closing the
    /// old one first.  Only valid after a successful [`login`](Self::login).
    pub async fn reconnect(&self) -> Result<GatewayEvents> {
        if self.user.lock().is_none() {
            return Err(Error::ConnectionNotReady);
        }
        // A receiver left over from the previous connection is stale.
        self.events.lock().take();

        let events = self.session.lock().await.open(&self.api).await?;
        tracing::info!("gateway reconnected");
        Ok(events)
    }

    /// Close the gateway connection, if one is open.
    pub async fn shutdown(&self) {
        self.session.lock().await.shutdown().await;
    }

    pub fn gateway_state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn watch_gateway_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// How the most recent gateway connection ended.
    pub async fn last_close(&self) -> Option<CloseReason> {
        self.session.lock().await.last_close()
    }

    /// The identity resolved by the last successful `login`.
    pub fn current_user(&self) -> Option<User> {
        self.user.lock().clone()
    }

    /// Pacing for holder-initiated reconnects, from `gateway.reconnect`.
    pub fn reconnect_backoff(&self) -> &ReconnectBackoff {
        &self.backoff
    }

    // ── REST ─────────────────────────────────────────────────────────

    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<Message> {
        self.api.post_message(channel_id, content).await
    }

    pub async fn send_message_with_embed(
        &self,
        channel_id: &str,
        content: &str,
        embed: &Embed,
    ) -> Result<Message> {
        self.api
            .post_message_with_embed(channel_id, content, embed)
            .await
    }

    pub async fn send_message_with_attachment(
        &self,
        channel_id: &str,
        content: &str,
        attachment: &Attachment,
    ) -> Result<Message> {
        self.api
            .post_message_with_attachment(channel_id, content, attachment)
            .await
    }

    pub async fn update_avatar(&self, avatar: &AvatarData) -> Result<User> {
        self.api.patch_avatar(avatar).await
    }

    pub async fn update_banner_color(&self, color: u32) -> Result<User> {
        self.api.patch_banner_color(color).await
    }

    /// Enable every gateway intent for the application.  `all = false`
    /// is a no-op.
    pub async fn enable_all_intents(&self, opts: IntentsOptions) -> Result<()> {
        self.api.patch_intents(opts).await
    }
}
