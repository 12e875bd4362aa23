//! MIME flattening and raw message construction
//!
//! Parsing runs leaves first: [`process_part`] classifies one part,
//! [`PartsWalker`] recurses over the tree, [`MessageParser`] extracts headers
//! and assembles the result. [`RawMessageBuilder`] goes the other way.
//! Everything here is pure and safe to call from any thread.

mod compose;
pub mod encoding;
mod parser;
mod part;
mod walker;

pub use compose::{RawMessageBuilder, TransferEncoding};
pub use parser::MessageParser;
pub use part::{Extracted, is_inline, process_part, strip_angle_brackets};
pub use walker::{BodyPolicy, DEFAULT_MAX_DEPTH, PartsWalker};
