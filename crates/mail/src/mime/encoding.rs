//! Body encodings used on the Gmail wire

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE};
use base64::prelude::*;

/// Decode base64-encoded body data into text
///
/// Gmail uses URL-safe base64 but padding can vary, so we try multiple decoders.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_body(data: &str) -> Option<String> {
    decode_bytes(data).map(|bytes| match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Decode base64 body or attachment data into raw bytes
pub fn decode_bytes(data: &str) -> Option<Vec<u8>> {
    let decoders: &[&base64::engine::GeneralPurpose] =
        &[&BASE64_URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD];

    decoders.iter().find_map(|decoder| decoder.decode(data).ok())
}

/// Encode bytes as unpadded base64url (`+` becomes `-`, `/` becomes `_`)
pub fn encode_base64url(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Quoted-printable encode a body
pub fn encode_quoted_printable(body: &str) -> String {
    quoted_printable::encode_to_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body_unpadded_url_safe() {
        // "Hello, World!" in base64url
        assert_eq!(decode_body("SGVsbG8sIFdvcmxkIQ"), Some("Hello, World!".to_string()));
    }

    #[test]
    fn test_decode_body_padded() {
        assert_eq!(decode_body("SGVsbG8sIFdvcmxkIQ=="), Some("Hello, World!".to_string()));
    }

    #[test]
    fn test_decode_body_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in the URL-safe alphabet
        assert_eq!(decode_bytes("-_8"), Some(vec![0xfb, 0xff]));
        assert_eq!(decode_bytes("+/8"), Some(vec![0xfb, 0xff]));
    }

    #[test]
    fn test_decode_body_malformed() {
        assert_eq!(decode_body("not base64 at all!"), None);
    }

    #[test]
    fn test_decode_body_invalid_utf8_is_lossy() {
        let encoded = encode_base64url(&[b'h', b'i', 0xff]);
        assert_eq!(decode_body(&encoded), Some("hi\u{fffd}".to_string()));
    }

    #[test]
    fn test_encode_base64url_has_no_padding_or_std_chars() {
        let encoded = encode_base64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");

        let encoded = encode_base64url(b"a");
        assert_eq!(encoded, "YQ");
    }

    #[test]
    fn test_encode_quoted_printable() {
        assert_eq!(encode_quoted_printable("a=b"), "a=3Db");
        assert_eq!(encode_quoted_printable("café"), "caf=C3=A9");
    }
}
