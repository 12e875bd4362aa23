//! Classification and decoding of a single MIME leaf

use chrono::Utc;
use log::warn;

use super::encoding::decode_body;
use crate::gmail::api::MessagePart;
use crate::models::{AttachmentRef, AttachmentSource};

/// Content gathered from one or more MIME leaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub html: String,
    pub text: String,
    pub attachments: Vec<AttachmentRef>,
    pub inline_images: Vec<AttachmentRef>,
}

impl Extracted {
    /// Append another extraction after this one
    pub fn append(&mut self, other: Extracted) {
        self.html.push_str(&other.html);
        self.text.push_str(&other.text);
        self.attachments.extend(other.attachments);
        self.inline_images.extend(other.inline_images);
    }

    /// Move only the attachment lists of another extraction into this one
    pub fn append_attachments(&mut self, other: Extracted) {
        self.attachments.extend(other.attachments);
        self.inline_images.extend(other.inline_images);
    }
}

/// Classify one part by its own content and append what it contributes.
///
/// Children are never looked at here; containers are handled by the walker.
/// Unknown or empty parts contribute nothing.
pub fn process_part(part: &MessagePart, out: &mut Extracted) {
    let mime_type = part.mime_type();

    match (mime_type, part.body_data()) {
        ("text/html", Some(data)) => out.html.push_str(&decode_or_empty(part, data)),
        ("text/plain", Some(data)) => out.text.push_str(&decode_or_empty(part, data)),
        _ if mime_type.starts_with("image/") => {
            if let Some(image) = image_ref(part) {
                if image.is_inline {
                    out.inline_images.push(image);
                } else {
                    out.attachments.push(image);
                }
            }
        }
        _ => {
            if let Some(id) = part.attachment_id()
                && !part.filename().is_empty()
            {
                out.attachments.push(AttachmentRef {
                    filename: part.filename().to_string(),
                    mime_type: mime_type.to_string(),
                    source: AttachmentSource::AttachmentId(id.to_string()),
                    size: part.body_size(),
                    content_id: content_id(part),
                    is_inline: false,
                });
            }
        }
    }
}

fn decode_or_empty(part: &MessagePart, data: &str) -> String {
    decode_body(data).unwrap_or_else(|| {
        warn!(
            "Failed to decode {} body of part {}",
            part.mime_type(),
            part.part_id.as_deref().unwrap_or("?")
        );
        String::new()
    })
}

fn image_ref(part: &MessagePart) -> Option<AttachmentRef> {
    let source = match (part.body_data(), part.attachment_id()) {
        (Some(data), _) => AttachmentSource::Data(data.to_string()),
        (None, Some(id)) => AttachmentSource::AttachmentId(id.to_string()),
        (None, None) => return None,
    };

    let filename = if part.filename().is_empty() {
        synthesized_image_name(part.mime_type())
    } else {
        part.filename().to_string()
    };

    Some(AttachmentRef {
        filename,
        mime_type: part.mime_type().to_string(),
        source,
        size: part.body_size(),
        content_id: content_id(part),
        is_inline: is_inline(part),
    })
}

/// `image_<millis>.<subtype>` for images sent without a filename
fn synthesized_image_name(mime_type: &str) -> String {
    let subtype = mime_type.split_once('/').map_or("", |(_, sub)| sub);
    format!("image_{}.{}", Utc::now().timestamp_millis(), subtype)
}

/// Inline when the disposition says so or the part can be referenced by `cid:`
pub fn is_inline(part: &MessagePart) -> bool {
    let inline_disposition = part
        .header_ignore_case("Content-Disposition")
        .is_some_and(|d| d.to_ascii_lowercase().contains("inline"));

    inline_disposition || part.header_ignore_case("Content-ID").is_some()
}

fn content_id(part: &MessagePart) -> String {
    part.header_ignore_case("Content-ID")
        .map(strip_angle_brackets)
        .unwrap_or_default()
}

/// Remove `<` and `>` from a Content-ID value
pub fn strip_angle_brackets(value: &str) -> String {
    value.replace(['<', '>'], "").trim().to_string()
}
