use serde::{Deserialize, Serialize};

/// A file uploaded alongside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content: AttachmentContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    Bytes(Vec<u8>),
    Text(String),
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<AttachmentContent>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Raw bytes for the multipart file part.
    pub fn bytes(&self) -> Vec<u8> {
        match &self.content {
            AttachmentContent::Bytes(b) => b.clone(),
            AttachmentContent::Text(t) => t.as_bytes().to_vec(),
        }
    }
}

impl From<Vec<u8>> for AttachmentContent {
    fn from(b: Vec<u8>) -> Self {
        AttachmentContent::Bytes(b)
    }
}

impl From<String> for AttachmentContent {
    fn from(t: String) -> Self {
        AttachmentContent::Text(t)
    }
}

impl From<&str> for AttachmentContent {
    fn from(t: &str) -> Self {
        AttachmentContent::Text(t.to_owned())
    }
}

/// Entry in the `attachments` array of a multipart `payload_json`.
/// `id` is the index of the matching `files[n]` part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub id: u32,
    pub filename: String,
}
