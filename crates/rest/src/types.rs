//! Request bodies.  Responses decode straight into `ck_domain::model`.

use ck_domain::model::{AttachmentRef, Embed};
use serde::{Deserialize, Serialize};

/// POST /channels/{id}/messages: JSON body, or the `payload_json` part
/// of a multipart upload.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessage<'a> {
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<&'a Embed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,
}

/// PATCH /users/@me: only the fields being changed are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModifyCurrentUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_color: Option<u32>,
}

/// GET /gateway/bot response body.  Shard and session-limit fields are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayBotResponse {
    pub url: String,
}
