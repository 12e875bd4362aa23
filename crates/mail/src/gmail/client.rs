//! Gmail API HTTP client
//!
//! Provides methods for listing, fetching, sending and labeling messages.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use super::api::{
    AttachmentResponse, GmailMessage, ListMessagesResponse, MessageRef, ModifyRequest,
    ProfileResponse, SendRequest,
};
use super::labels;
use crate::config::{MailConfig, SessionTokens};
use crate::mime::RawMessageBuilder;
use crate::mime::encoding::decode_bytes;
use crate::models::{ComposeInput, MessageId, RawMessage};

/// Gmail responses that callers may want to handle specifically
#[derive(Debug, thiserror::Error)]
pub enum GmailApiError {
    /// The message or attachment does not exist (404)
    #[error("Gmail resource not found: {0}")]
    NotFound(String),
    /// The access token was rejected (401)
    #[error("Gmail rejected the access token")]
    Unauthorized,
}

/// Gmail API client bound to one session's access token
pub struct GmailClient {
    tokens: SessionTokens,
    base_url: String,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Create a new Gmail client
    pub fn new(tokens: SessionTokens) -> Self {
        Self::with_base_url(tokens, Self::BASE_URL)
    }

    /// Create a client talking to another endpoint (e.g. a local stub)
    pub fn with_base_url(tokens: SessionTokens, base_url: impl Into<String>) -> Self {
        Self {
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.tokens.access_token)
    }

    /// List message IDs, newest first
    ///
    /// # Arguments
    /// * `label` - Only messages carrying this label (e.g. "INBOX")
    /// * `query` - Gmail search query (same syntax as the search box)
    /// * `max_results` - Maximum number of messages to return per page (1-500)
    /// * `page_token` - Optional page token for pagination
    pub fn list_messages(
        &self,
        label: Option<&str>,
        query: Option<&str>,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse> {
        let url = self.list_url(label, query, max_results, page_token);

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer())
            .call()
            .map_err(|e| api_error(e, "list messages"))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse list messages response")
    }

    fn list_url(
        &self,
        label: Option<&str>,
        query: Option<&str>,
        max_results: usize,
        page_token: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}/users/me/messages?maxResults={}",
            self.base_url,
            max_results.clamp(1, 500)
        );

        if let Some(label) = label {
            url.push_str(&format!("&labelIds={}", urlencoding::encode(label)));
        }
        if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
            url.push_str(&format!("&q={}", urlencoding::encode(query)));
        }
        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        url
    }

    /// Get full message details by ID
    pub fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        let url = format!(
            "{}/users/me/messages/{}?format=full",
            self.base_url,
            id.as_str()
        );

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer())
            .call()
            .map_err(|e| api_error(e, id.as_str()))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse message response")
    }

    /// Get multiple messages with retry logic
    pub fn get_messages_batch(&self, ids: &[MessageId]) -> Vec<Result<GmailMessage>> {
        ids.iter()
            .map(|id| self.get_message_with_retry(id, 3))
            .collect()
    }

    /// Get a message with exponential backoff retry
    fn get_message_with_retry(&self, id: &MessageId, max_retries: u32) -> Result<GmailMessage> {
        let mut delay = Duration::from_millis(100);
        let mut attempt = 1;

        loop {
            match self.get_message(id) {
                Ok(msg) => return Ok(msg),
                Err(e) if attempt >= max_retries || !is_retryable(&e) => return Err(e),
                Err(_) => {
                    let jitter = Duration::from_millis(rand_jitter());
                    std::thread::sleep(delay + jitter);
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    /// Download an attachment's bytes
    pub fn get_attachment(&self, message_id: &MessageId, attachment_id: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/users/me/messages/{}/attachments/{}",
            self.base_url,
            message_id.as_str(),
            attachment_id
        );

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer())
            .call()
            .map_err(|e| api_error(e, attachment_id))?;

        let attachment: AttachmentResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse attachment response")?;

        let data = attachment.data.unwrap_or_default();
        decode_bytes(&data).context("Attachment data is not valid base64")
    }

    /// Send an already encoded message
    pub fn send_raw(&self, raw: &RawMessage, thread_id: Option<&str>) -> Result<MessageRef> {
        let url = format!("{}/users/me/messages/send", self.base_url);
        let request = SendRequest {
            raw: raw.as_str(),
            thread_id,
        };

        let mut response = ureq::post(&url)
            .header("Authorization", &self.bearer())
            .send_json(&request)
            .map_err(|e| api_error(e, "send message"))?;

        let sent: MessageRef = response
            .body_mut()
            .read_json()
            .context("Failed to parse send response")?;

        info!("Sent message {}", sent.id);
        Ok(sent)
    }

    /// Compose and send a message
    ///
    /// An empty `from_address` is filled from the config, then from the
    /// account profile.
    pub fn send(&self, input: &ComposeInput, config: &MailConfig) -> Result<MessageRef> {
        let mut input = input.clone();
        if input.from_address.trim().is_empty() {
            input.from_address = if config.from_address.trim().is_empty() {
                self.get_profile()?.email_address
            } else {
                config.from_address.clone()
            };
        }

        let raw = RawMessageBuilder::new(config.transfer_encoding).build(&input)?;
        self.send_raw(&raw, None)
    }

    /// Add and remove labels on a message
    pub fn modify_labels(&self, id: &MessageId, add: &[&str], remove: &[&str]) -> Result<()> {
        let url = format!("{}/users/me/messages/{}/modify", self.base_url, id.as_str());
        let request = ModifyRequest {
            add_label_ids: add,
            remove_label_ids: remove,
        };

        ureq::post(&url)
            .header("Authorization", &self.bearer())
            .send_json(&request)
            .map_err(|e| api_error(e, id.as_str()))?;

        Ok(())
    }

    /// Archive a message (remove from INBOX)
    pub fn archive(&self, id: &MessageId) -> Result<()> {
        info!("Archiving message {}", id.as_str());
        self.modify_labels(id, &[], &[labels::INBOX])
    }

    pub fn mark_read(&self, id: &MessageId) -> Result<()> {
        self.modify_labels(id, &[], &[labels::UNREAD])
    }

    pub fn mark_unread(&self, id: &MessageId) -> Result<()> {
        self.modify_labels(id, &[labels::UNREAD], &[])
    }

    pub fn star(&self, id: &MessageId) -> Result<()> {
        self.modify_labels(id, &[labels::STARRED], &[])
    }

    pub fn unstar(&self, id: &MessageId) -> Result<()> {
        self.modify_labels(id, &[], &[labels::STARRED])
    }

    /// Move a message to the trash
    pub fn trash(&self, id: &MessageId) -> Result<()> {
        info!("Trashing message {}", id.as_str());
        let url = format!("{}/users/me/messages/{}/trash", self.base_url, id.as_str());

        ureq::post(&url)
            .header("Authorization", &self.bearer())
            .send_empty()
            .map_err(|e| api_error(e, id.as_str()))?;

        Ok(())
    }

    /// Get the authenticated account's profile
    pub fn get_profile(&self) -> Result<ProfileResponse> {
        let url = format!("{}/users/me/profile", self.base_url);

        let mut response = ureq::get(&url)
            .header("Authorization", &self.bearer())
            .call()
            .map_err(|e| api_error(e, "get profile"))?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse profile response")
    }
}

/// Map a transport error, surfacing 401 and 404 as [`GmailApiError`]
fn api_error(err: ureq::Error, what: &str) -> anyhow::Error {
    match err {
        ureq::Error::StatusCode(404) => GmailApiError::NotFound(what.to_string()).into(),
        ureq::Error::StatusCode(401) => GmailApiError::Unauthorized.into(),
        e => anyhow::anyhow!("Gmail request failed ({}): {}", what, e),
    }
}

fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GmailApiError>().is_none()
}

/// Generate a random jitter value (0-100ms)
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    hasher.finish() % 100
}
