//! Mail crate - MIME parsing and message composition for Quill
//!
//! This crate provides platform-independent mail functionality including:
//! - Flattening Gmail `format=full` payloads into [`ParsedEmail`] records
//! - Building base64url RFC 2822 messages for `messages.send`
//! - A thin Gmail REST client for listing, reading, sending and labeling
//! - Config loading for parser/composer options and session tokens
//!
//! The parsing and composing code does no I/O and keeps no state, so it can
//! be called from any thread and tested with plain JSON fixtures.

pub mod config;
pub mod error;
pub mod gmail;
pub mod mime;
pub mod models;

pub use config::{MailConfig, SessionTokens};
pub use error::MailError;
pub use gmail::api::{GmailMessage, MessagePart};
pub use gmail::{GmailApiError, GmailClient, labels};
pub use mime::{BodyPolicy, MessageParser, PartsWalker, RawMessageBuilder, TransferEncoding};
pub use models::{
    AttachmentRef, AttachmentSource, ComposeInput, MessageId, ParsedEmail, RawMessage, ThreadId,
};
