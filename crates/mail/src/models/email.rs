//! Flattened email representation handed to the UI layer
//!
//! Field names serialize in camelCase (`htmlBody`, `hasAttachments`, ...)
//! because rendering code matches on them exactly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{MessageId, ThreadId};

/// Subject used when a message has no `Subject` header
pub const DEFAULT_SUBJECT: &str = "No Subject";
/// Sender used when a message has no `From` header
pub const DEFAULT_SENDER: &str = "Unknown Sender";

/// Where an attachment's bytes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentSource {
    /// Content embedded in the message, base64url encoded
    Data(String),
    /// Handle for a follow-up `messages.attachments.get` call
    AttachmentId(String),
}

/// A reference to an attachment or inline image found in the MIME tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub filename: String,
    pub mime_type: String,
    #[serde(flatten)]
    pub source: AttachmentSource,
    #[serde(default)]
    pub size: u64,
    /// `Content-ID` without angle brackets, empty if absent
    #[serde(default)]
    pub content_id: String,
    pub is_inline: bool,
}

impl AttachmentRef {
    /// Embedded base64url content, if any
    pub fn data(&self) -> Option<&str> {
        match &self.source {
            AttachmentSource::Data(data) => Some(data),
            AttachmentSource::AttachmentId(_) => None,
        }
    }

    /// Attachment handle, if the content must be fetched separately
    pub fn attachment_id(&self) -> Option<&str> {
        match &self.source {
            AttachmentSource::AttachmentId(id) => Some(id),
            AttachmentSource::Data(_) => None,
        }
    }
}

/// A Gmail message flattened into headers, bodies and attachment lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEmail {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub date: String,
    pub message_id: String,
    pub snippet: String,
    pub label_ids: BTreeSet<String>,
    pub html_body: String,
    pub text_body: String,
    pub attachments: Vec<AttachmentRef>,
    pub inline_images: Vec<AttachmentRef>,
    pub has_attachments: bool,
    pub has_inline_images: bool,
}

impl ParsedEmail {
    /// Check whether the message carries a label (e.g. "UNREAD")
    pub fn has_label(&self, label: &str) -> bool {
        self.label_ids.contains(label)
    }

    /// HTML body when present, otherwise the plain text body
    pub fn display_body(&self) -> &str {
        if self.html_body.is_empty() {
            &self.text_body
        } else {
            &self.html_body
        }
    }

    /// Find an inline image by its Content-ID (as referenced from `cid:` URLs)
    pub fn inline_image(&self, content_id: &str) -> Option<&AttachmentRef> {
        let wanted = content_id.trim_start_matches("cid:");
        self.inline_images
            .iter()
            .find(|img| img.content_id == wanted)
    }
}
