//! Message send payload
//!
//! Attachments are read fully into memory while the payload is built. Once
//! at least one attachment resolves, the message is sent as a multipart form
//! with the JSON payload embedded in its `payload_json` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::body::{ActionBody, MultipartForm};
use super::mentions::{MentionOptions, MentionPolicy};
use crate::{Error, Result};

/// Multipart field that carries the JSON payload
pub const PAYLOAD_JSON_FIELD: &str = "payload_json";

/// File to attach to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// Only a path; name and description are derived from it
    PathOnly(PathBuf),
    /// Path with optional explicit name and description
    PathWithMetadata {
        path: PathBuf,
        name: Option<String>,
        description: Option<String>,
    },
}

impl AttachmentSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::PathOnly(path.into())
    }

    pub fn with_metadata(
        path: impl Into<PathBuf>,
        name: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self::PathWithMetadata {
            path: path.into(),
            name,
            description,
        }
    }

    /// Normalize to the metadata form so both shapes resolve the same way
    fn into_parts(self) -> (PathBuf, Option<String>, Option<String>) {
        match self {
            Self::PathOnly(path) => (path, None, None),
            Self::PathWithMetadata {
                path,
                name,
                description,
            } => (path, name, description),
        }
    }
}

impl From<&str> for AttachmentSource {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<PathBuf> for AttachmentSource {
    fn from(path: PathBuf) -> Self {
        Self::PathOnly(path)
    }
}

/// Options for sending a message
#[derive(Debug, Clone, Default)]
pub struct SendMessageOptions {
    pub content: String,
    /// Message id this message replies to
    pub reply: Option<String>,
    pub tts: bool,
    pub embeds: Vec<Value>,
    pub allowed_mentions: MentionOptions,
    pub stickers: Vec<String>,
    pub attachments: Vec<AttachmentSource>,
}

impl SendMessageOptions {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_reply(mut self, message_id: impl Into<String>) -> Self {
        self.reply = Some(message_id.into());
        self
    }

    pub fn with_tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    pub fn with_embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_allowed_mentions(mut self, mentions: MentionOptions) -> Self {
        self.allowed_mentions = mentions;
        self
    }

    pub fn with_sticker(mut self, sticker_id: impl Into<String>) -> Self {
        self.stickers.push(sticker_id.into());
        self
    }

    pub fn with_attachment(mut self, attachment: impl Into<AttachmentSource>) -> Self {
        self.attachments.push(attachment.into());
        self
    }
}

/// Normalized attachment entry inside the JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub id: usize,
    pub filename: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReference {
    pub message_id: String,
}

/// JSON object sent for a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    pub content: String,
    pub tts: bool,
    pub embeds: Vec<Value>,
    pub allowed_mentions: MentionPolicy,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message_reference: Option<MessageReference>,
    pub components: Option<Value>,
    pub sticker_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<AttachmentDescriptor>,
}

#[derive(Debug, Clone)]
struct AttachmentFile {
    index: usize,
    filename: String,
    data: Vec<u8>,
}

/// Message ready to be handed to the request builder
#[derive(Debug, Clone)]
pub struct MessagePayload {
    content: MessageContent,
    files: Vec<AttachmentFile>,
}

impl MessagePayload {
    /// Resolve attachments and assemble the wire payload
    ///
    /// Entries with an empty path are skipped; their index is not reused by
    /// later entries. A file that cannot be read aborts the build.
    pub async fn build(options: SendMessageOptions) -> Result<Self> {
        let mut files = Vec::new();
        let mut descriptors = Vec::new();

        for (index, source) in options.attachments.into_iter().enumerate() {
            let (path, name, description) = source.into_parts();
            if path.as_os_str().is_empty() {
                warn!("Skipping attachment {} with an empty path", index);
                continue;
            }

            let filename = resolve_filename(&path, name, index);
            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| Error::attachment(&path, e))?;
            debug!(
                "Attachment {} resolved to {} ({} bytes)",
                index,
                filename,
                data.len()
            );

            descriptors.push(AttachmentDescriptor {
                id: index,
                description: description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| filename.clone()),
                filename: filename.clone(),
            });
            files.push(AttachmentFile {
                index,
                filename,
                data,
            });
        }

        let content = MessageContent {
            content: options.content,
            tts: options.tts,
            embeds: options.embeds,
            allowed_mentions: MentionPolicy::new(options.allowed_mentions),
            message_reference: options
                .reply
                .map(|message_id| MessageReference { message_id }),
            components: None,
            sticker_ids: options.stickers,
            attachments: descriptors,
        };

        Ok(Self { content, files })
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Whether the payload goes out as a multipart form
    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }

    /// Encode for the request builder
    pub fn into_body(self) -> Result<ActionBody> {
        if self.files.is_empty() {
            return ActionBody::json(&self.content);
        }

        let mut form = MultipartForm::new();
        for file in self.files {
            form = form.file(format!("files[{}]", file.index), file.filename, file.data);
        }
        let payload_json = serde_json::to_string(&self.content)?;
        Ok(ActionBody::Multipart(
            form.json_text(PAYLOAD_JSON_FIELD, payload_json),
        ))
    }
}

/// Explicit name, else the path's base name, else `file-{index}`
fn resolve_filename(path: &Path, name: Option<String>, index: usize) -> String {
    name.filter(|n| !n.is_empty())
        .or_else(|| {
            path.file_name()
                .map(|base| base.to_string_lossy().into_owned())
                .filter(|base| !base.is_empty())
        })
        .unwrap_or_else(|| format!("file-{}", index))
}
