//! Top-level message parsing
//!
//! Turns a Gmail `format=full` message into a [`ParsedEmail`]. Missing
//! headers, undecodable bodies and unknown parts fall back to defaults so a
//! partially broken message still renders; only a missing payload or an
//! absurdly deep MIME tree is rejected.

use log::debug;
use rayon::prelude::*;

use super::walker::{BodyPolicy, DEFAULT_MAX_DEPTH, PartsWalker};
use crate::error::MailError;
use crate::gmail::api::{GmailMessage, MessagePart};
use crate::models::{DEFAULT_SENDER, DEFAULT_SUBJECT, MessageId, ParsedEmail, ThreadId};

/// Parses Gmail messages into flat [`ParsedEmail`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageParser {
    walker: PartsWalker,
}

impl MessageParser {
    pub fn new(walker: PartsWalker) -> Self {
        Self { walker }
    }

    /// Parser with a custom depth limit and body policy
    pub fn with_options(max_depth: usize, policy: BodyPolicy) -> Self {
        Self::new(PartsWalker::new(max_depth, policy))
    }

    /// Parse one message
    pub fn parse(&self, message: &GmailMessage) -> Result<ParsedEmail, MailError> {
        let payload = message.payload.as_ref().ok_or_else(|| {
            MailError::MalformedInput(format!("message {} has no payload", message.id))
        })?;

        let content = self.walker.walk(payload)?;

        debug!(
            "Parsed message {}: {} html bytes, {} text bytes, {} attachments, {} inline images",
            message.id,
            content.html.len(),
            content.text.len(),
            content.attachments.len(),
            content.inline_images.len()
        );

        Ok(ParsedEmail {
            id: MessageId::new(&message.id),
            thread_id: ThreadId::new(&message.thread_id),
            subject: header_or(payload, "Subject", DEFAULT_SUBJECT),
            from: header_or(payload, "From", DEFAULT_SENDER),
            to: header_or(payload, "To", ""),
            date: header_or(payload, "Date", ""),
            message_id: header_or(payload, "Message-ID", ""),
            snippet: message.snippet.clone().unwrap_or_default(),
            label_ids: message
                .label_ids
                .iter()
                .flatten()
                .cloned()
                .collect(),
            has_attachments: !content.attachments.is_empty(),
            has_inline_images: !content.inline_images.is_empty(),
            html_body: content.html,
            text_body: content.text,
            attachments: content.attachments,
            inline_images: content.inline_images,
        })
    }

    /// Parse a page of messages in parallel, keeping input order
    pub fn parse_all(&self, messages: &[GmailMessage]) -> Vec<Result<ParsedEmail, MailError>> {
        messages.par_iter().map(|m| self.parse(m)).collect()
    }
}

impl From<&crate::config::MailConfig> for MessageParser {
    fn from(config: &crate::config::MailConfig) -> Self {
        let max_depth = if config.max_depth == 0 {
            DEFAULT_MAX_DEPTH
        } else {
            config.max_depth
        };
        Self::with_options(max_depth, config.body_policy)
    }
}

fn header_or(payload: &MessagePart, name: &str, default: &str) -> String {
    payload.header(name).unwrap_or(default).to_string()
}
