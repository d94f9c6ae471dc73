use base64::Engine;
use serde::{Deserialize, Serialize};

/// A platform account.  Bots see themselves through `GET /users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Avatar upload
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// New avatar image for `PATCH /users/@me`.
///
/// The platform expects an image data URI.  Raw bytes are encoded here,
/// with the MIME type sniffed from the file's magic number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarData {
    Bytes(Vec<u8>),
    DataUri(String),
}

impl AvatarData {
    pub fn to_data_uri(&self) -> String {
        match self {
            AvatarData::DataUri(uri) => uri.clone(),
            AvatarData::Bytes(bytes) => format!(
                "data:{};base64,{}",
                sniff_image_mime(bytes),
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
        }
    }
}

impl From<Vec<u8>> for AvatarData {
    fn from(bytes: Vec<u8>) -> Self {
        AvatarData::Bytes(bytes)
    }
}

impl From<String> for AvatarData {
    fn from(uri: String) -> Self {
        AvatarData::DataUri(uri)
    }
}

/// Best-effort image type detection.  Unknown input is labelled PNG and
/// left for the platform to reject.
fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}
