//! Domain models for parsed and composed mail

mod compose;
mod email;
mod ids;

pub use compose::{ComposeInput, RawMessage};
pub use email::{AttachmentRef, AttachmentSource, DEFAULT_SENDER, DEFAULT_SUBJECT, ParsedEmail};
pub use ids::{MessageId, ThreadId};
