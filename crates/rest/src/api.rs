//! The `BotApi` trait defines the REST surface used by the client facade
//! (real HTTP, or a test double).

use async_trait::async_trait;
use ck_domain::error::Result;
use ck_domain::model::{Attachment, AvatarData, Embed, IntentsOptions, Message, User};

/// Abstraction over the platform's REST endpoints.
///
/// Every method performs at most one request, never retries, and reports
/// failure as `Error::RequestFailed` labelled with the operation name.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Current bot identity (GET /users/@me).
    async fn fetch_self(&self) -> Result<User>;

    /// WebSocket endpoint for the gateway (GET /gateway/bot).
    async fn fetch_gateway_url(&self) -> Result<String>;

    /// Plain text message (POST /channels/{id}/messages).
    async fn post_message(&self, channel_id: &str, content: &str) -> Result<Message>;

    /// Message with one embed (POST /channels/{id}/messages).
    async fn post_message_with_embed(
        &self,
        channel_id: &str,
        content: &str,
        embed: &Embed,
    ) -> Result<Message>;

    /// Message with one uploaded file, sent as multipart
    /// (POST /channels/{id}/messages).
    async fn post_message_with_attachment(
        &self,
        channel_id: &str,
        content: &str,
        attachment: &Attachment,
    ) -> Result<Message>;

    /// Replace the bot's avatar (PATCH /users/@me).
    async fn patch_avatar(&self, avatar: &AvatarData) -> Result<User>;

    /// Set the profile banner color (PATCH /users/@me).
    async fn patch_banner_color(&self, color: u32) -> Result<User>;

    /// Enable every gateway intent (PATCH /applications/@me/bot).
    /// Sends nothing when `opts.all` is false.
    async fn patch_intents(&self, opts: IntentsOptions) -> Result<()>;
}
