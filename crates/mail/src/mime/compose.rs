//! RFC 2822 message construction for `messages.send`

use serde::{Deserialize, Serialize};

use super::encoding::{encode_base64url, encode_quoted_printable};
use crate::error::MailError;
use crate::models::{ComposeInput, RawMessage};

/// How the HTML body is written under the declared
/// `Content-Transfer-Encoding: quoted-printable` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferEncoding {
    /// Body written as given. Gmail accepts this even though the header
    /// claims quoted-printable; non-ASCII text and long lines pass through as is.
    #[default]
    Verbatim,
    /// Body actually quoted-printable encoded
    QuotedPrintable,
}

/// Builds base64url-encoded HTML messages
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMessageBuilder {
    encoding: TransferEncoding,
}

impl RawMessageBuilder {
    pub fn new(encoding: TransferEncoding) -> Self {
        Self { encoding }
    }

    /// Validate the input and encode it for the `raw` send field
    pub fn build(&self, input: &ComposeInput) -> Result<RawMessage, MailError> {
        let text = self.render(input)?;
        Ok(RawMessage::new(encode_base64url(text.as_bytes())))
    }

    /// Validate the input and produce the plain RFC 2822 text
    pub fn render(&self, input: &ComposeInput) -> Result<String, MailError> {
        require("to", &input.to)?;
        require("subject", &input.subject)?;
        require("message", &input.message)?;

        let mut lines = vec![format!("To: {}", input.to)];
        if let Some(cc) = non_blank(input.cc.as_deref()) {
            lines.push(format!("Cc: {cc}"));
        }
        if let Some(bcc) = non_blank(input.bcc.as_deref()) {
            lines.push(format!("Bcc: {bcc}"));
        }
        lines.push(format!("Subject: {}", input.subject));
        lines.push(format!("From: {}", input.from_address));
        lines.push("MIME-Version: 1.0".to_string());
        lines.push("Content-Type: text/html; charset=UTF-8".to_string());
        lines.push("Content-Transfer-Encoding: quoted-printable".to_string());
        lines.push(String::new());
        lines.push(match self.encoding {
            TransferEncoding::Verbatim => input.message.clone(),
            TransferEncoding::QuotedPrintable => encode_quoted_printable(&input.message),
        });

        Ok(lines.join("\n"))
    }
}

fn require(field: &'static str, value: &str) -> Result<(), MailError> {
    if value.trim().is_empty() {
        return Err(MailError::Validation { field });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
