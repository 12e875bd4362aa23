//! Gmail API integration
//!
//! This module provides:
//! - Gmail REST wire types (deserialized leniently, every field may be absent)
//! - A synchronous Gmail API client for listing, fetching, sending and labeling

mod client;

pub use client::{GmailApiError, GmailClient};

/// Well-known Gmail system label IDs
pub mod labels {
    pub const INBOX: &str = "INBOX";
    pub const UNREAD: &str = "UNREAD";
    pub const STARRED: &str = "STARRED";
    pub const SENT: &str = "SENT";
    pub const TRASH: &str = "TRASH";
    pub const SPAM: &str = "SPAM";
}

/// Gmail API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from listing messages
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
        pub next_page_token: Option<String>,
        pub result_size_estimate: Option<u32>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Clone, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        #[serde(default)]
        pub thread_id: String,
    }

    /// Full message from `messages.get(format=full)`
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct GmailMessage {
        pub id: String,
        pub thread_id: String,
        pub label_ids: Option<Vec<String>>,
        pub snippet: Option<String>,
        pub history_id: Option<String>,
        pub internal_date: Option<String>,
        pub size_estimate: Option<u64>,
        pub payload: Option<MessagePart>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(default)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    impl Header {
        pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                value: value.into(),
            }
        }
    }

    /// Body of a MIME part: inline base64url data or an attachment handle
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct MessageBody {
        pub size: Option<u64>,
        pub data: Option<String>,
        pub attachment_id: Option<String>,
    }

    /// One node of the MIME tree; the message payload is the root node
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct MessagePart {
        pub part_id: Option<String>,
        pub mime_type: Option<String>,
        pub filename: Option<String>,
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    impl MessagePart {
        /// MIME type, empty when absent
        pub fn mime_type(&self) -> &str {
            self.mime_type.as_deref().unwrap_or_default()
        }

        /// Filename, empty when absent
        pub fn filename(&self) -> &str {
            self.filename.as_deref().unwrap_or_default()
        }

        /// Child parts; empty for leaves
        pub fn children(&self) -> &[MessagePart] {
            self.parts.as_deref().unwrap_or_default()
        }

        /// First header with exactly this name
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .as_deref()?
                .iter()
                .find(|h| h.name == name)
                .map(|h| h.value.as_str())
        }

        /// First header matching this name case-insensitively
        pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
            self.headers
                .as_deref()?
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.as_str())
        }

        /// Inline base64url body data; empty data counts as absent
        pub fn body_data(&self) -> Option<&str> {
            self.body
                .as_ref()?
                .data
                .as_deref()
                .filter(|data| !data.is_empty())
        }

        /// Attachment handle, if the body must be fetched separately
        pub fn attachment_id(&self) -> Option<&str> {
            self.body.as_ref()?.attachment_id.as_deref()
        }

        /// Declared body size, 0 when absent
        pub fn body_size(&self) -> u64 {
            self.body.as_ref().and_then(|b| b.size).unwrap_or(0)
        }
    }

    /// Response from `messages.attachments.get`
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AttachmentResponse {
        pub size: Option<u64>,
        pub data: Option<String>,
    }

    /// Request body for `messages.send`
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendRequest<'a> {
        pub raw: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub thread_id: Option<&'a str>,
    }

    /// Request body for `messages.modify`
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ModifyRequest<'a> {
        pub add_label_ids: &'a [&'a str],
        pub remove_label_ids: &'a [&'a str],
    }

    /// Response from `users.getProfile`
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileResponse {
        pub email_address: String,
        pub messages_total: Option<u64>,
        pub threads_total: Option<u64>,
        pub history_id: Option<String>,
    }
}
