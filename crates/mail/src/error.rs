//! Error types for the mail core

/// Errors produced while parsing or composing messages.
///
/// Most malformed input is not an error at all: missing headers, bad base64
/// and unknown parts degrade to defaults. Only the cases below fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    /// A required compose field was blank
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    /// The message cannot be parsed at all (e.g. it has no payload)
    #[error("Malformed message: {0}")]
    MalformedInput(String),

    /// The MIME tree nests deeper than the configured limit
    #[error("MIME nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl MailError {
    /// Name of the offending field for validation errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field } => Some(*field),
            _ => None,
        }
    }
}
