//! Outgoing message input and the encoded raw message

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields of a message being composed
///
/// All values are plain strings and are written to the wire as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeInput {
    pub to: String,
    pub subject: String,
    /// HTML body
    pub message: String,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
    #[serde(default)]
    pub from_address: String,
}

impl ComposeInput {
    /// Create compose input with the required fields
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    pub fn bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = Some(bcc.into());
        self
    }

    pub fn from_address(mut self, from: impl Into<String>) -> Self {
        self.from_address = from.into();
        self
    }
}

/// A base64url (unpadded) RFC 2822 message, ready for the `raw` send field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMessage(String);

impl RawMessage {
    pub(crate) fn new(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
