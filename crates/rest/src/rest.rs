//! REST implementation of [`BotApi`].
//!
//! `RestClient` wraps a `reqwest::Client` and translates every trait
//! method into one authenticated HTTP call against the platform's
//! versioned API.  Failures are logged with their cause and surfaced to
//! the caller only as `Error::RequestFailed { operation }`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ck_domain::config::ApiConfig;
use ck_domain::error::{Error, Result};
use ck_domain::model::{
    Attachment, AttachmentRef, AvatarData, Embed, IntentsOptions, Message, User,
};
use ck_domain::resolver::EndpointResolver;
use ck_domain::trace::TraceEvent;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::BotApi;
use crate::credential::Credential;
use crate::types::{CreateMessage, GatewayBotResponse, ModifyCurrentUser};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the bot API.
///
/// Created once and shared; clones reuse the same connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    credential: Credential,
    user_agent: String,
    timeout: Duration,
}

impl RestClient {
    /// Build a new client from the shared `ApiConfig`.
    pub fn new(cfg: &ApiConfig, credential: Credential) -> Result<Self> {
        let timeout = Duration::from_millis(cfg.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            credential,
            user_agent: cfg.user_agent.clone(),
            timeout,
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Attach authorization, user agent and a per-request trace id.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header(reqwest::header::AUTHORIZATION, self.credential.authorization())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    /// Build the full URL for a path like `/users/@me`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send once.  Any transport error or non-2xx status becomes
    /// `RequestFailed { operation }`; the cause only reaches the log.
    async fn execute(
        &self,
        operation: &'static str,
        endpoint: &str,
        rb: RequestBuilder,
    ) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let status = resp.status();
                TraceEvent::RestCall {
                    operation: operation.to_owned(),
                    endpoint: endpoint.to_owned(),
                    status: status.as_u16(),
                    duration_ms,
                }
                .emit();

                if status.is_success() {
                    return Ok(resp);
                }

                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(
                    operation,
                    endpoint,
                    status = status.as_u16(),
                    body = %body,
                    "request rejected"
                );
                Err(Error::request_failed(operation))
            }
            Err(e) => {
                TraceEvent::RestCall {
                    operation: operation.to_owned(),
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();

                tracing::warn!(
                    operation,
                    endpoint,
                    timeout = e.is_timeout(),
                    error = %e,
                    "request failed"
                );
                Err(Error::request_failed(operation))
            }
        }
    }

    /// Read and decode a JSON body.
    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        endpoint: &str,
        resp: Response,
    ) -> Result<T> {
        let body = resp.text().await.map_err(|e| {
            tracing::warn!(operation, endpoint, error = %e, "failed to read response body");
            Error::request_failed(operation)
        })?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(operation, endpoint, error = %e, body = %body, "failed to parse response");
            Error::request_failed(operation)
        })
    }

    async fn create_message(
        &self,
        operation: &'static str,
        channel_id: &str,
        body: &CreateMessage<'_>,
    ) -> Result<Message> {
        let endpoint = format!("POST /channels/{channel_id}/messages");
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let resp = self
            .execute(operation, &endpoint, self.http.post(&url).json(body))
            .await?;
        Self::decode(operation, &endpoint, resp).await
    }

    async fn modify_current_user(
        &self,
        operation: &'static str,
        body: &ModifyCurrentUser,
    ) -> Result<User> {
        let endpoint = "PATCH /users/@me";
        let url = self.url("/users/@me");
        let resp = self
            .execute(operation, endpoint, self.http.patch(&url).json(body))
            .await?;
        Self::decode(operation, endpoint, resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl BotApi for RestClient {
    async fn fetch_self(&self) -> Result<User> {
        const OP: &str = "fetch_self";
        let url = self.url("/users/@me");
        let resp = self.execute(OP, "GET /users/@me", self.http.get(&url)).await?;
        Self::decode(OP, "GET /users/@me", resp).await
    }

    async fn fetch_gateway_url(&self) -> Result<String> {
        const OP: &str = "fetch_gateway_url";
        let url = self.url("/gateway/bot");
        let resp = self
            .execute(OP, "GET /gateway/bot", self.http.get(&url))
            .await?;
        let body: GatewayBotResponse = Self::decode(OP, "GET /gateway/bot", resp).await?;
        Ok(body.url)
    }

    async fn post_message(&self, channel_id: &str, content: &str) -> Result<Message> {
        let body = CreateMessage {
            content,
            embed: None,
            attachments: Vec::new(),
        };
        self.create_message("send_message", channel_id, &body).await
    }

    async fn post_message_with_embed(
        &self,
        channel_id: &str,
        content: &str,
        embed: &Embed,
    ) -> Result<Message> {
        let body = CreateMessage {
            content,
            embed: Some(embed),
            attachments: Vec::new(),
        };
        self.create_message("send_message_with_embed", channel_id, &body)
            .await
    }

    async fn post_message_with_attachment(
        &self,
        channel_id: &str,
        content: &str,
        attachment: &Attachment,
    ) -> Result<Message> {
        const OP: &str = "send_message_with_attachment";
        let payload = CreateMessage {
            content,
            embed: None,
            attachments: vec![AttachmentRef {
                id: 0,
                filename: attachment.name.clone(),
            }],
        };
        let payload_json = serde_json::to_string(&payload).map_err(|e| {
            tracing::warn!(operation = OP, error = %e, "failed to encode payload_json");
            Error::request_failed(OP)
        })?;

        let form = Form::new().text("payload_json", payload_json).part(
            "files[0]",
            Part::bytes(attachment.bytes()).file_name(attachment.name.clone()),
        );

        let endpoint = format!("POST /channels/{channel_id}/messages");
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let resp = self
            .execute(OP, &endpoint, self.http.post(&url).multipart(form))
            .await?;
        Self::decode(OP, &endpoint, resp).await
    }

    async fn patch_avatar(&self, avatar: &AvatarData) -> Result<User> {
        let body = ModifyCurrentUser {
            avatar: Some(avatar.to_data_uri()),
            ..Default::default()
        };
        self.modify_current_user("update_avatar", &body).await
    }

    async fn patch_banner_color(&self, color: u32) -> Result<User> {
        let body = ModifyCurrentUser {
            banner_color: Some(color),
            ..Default::default()
        };
        self.modify_current_user("update_banner_color", &body).await
    }

    async fn patch_intents(&self, opts: IntentsOptions) -> Result<()> {
        const OP: &str = "enable_all_intents";
        let Some(patch) = opts.to_patch() else {
            tracing::debug!("intents unchanged, nothing to send");
            return Ok(());
        };
        let url = self.url("/applications/@me/bot");
        self.execute(
            OP,
            "PATCH /applications/@me/bot",
            self.http.patch(&url).json(&patch),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl EndpointResolver for RestClient {
    async fn resolve_gateway_url(&self) -> Result<String> {
        self.fetch_gateway_url().await
    }
}
