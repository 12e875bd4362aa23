//! Integration tests for the mail crate
//!
//! These tests run complete Gmail payloads through the parser and decode
//! composed messages back to their RFC 2822 text.

use base64::prelude::*;
use quill_mail::mime::encoding::decode_body;
use quill_mail::{
    BodyPolicy, ComposeInput, GmailMessage, MailConfig, MailError, MessageParser, ParsedEmail,
    RawMessageBuilder, TransferEncoding,
};
use serde_json::json;

const NESTED_MESSAGE: &str = include_str!("fixtures/nested_message.json");

fn b64(text: &str) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(text)
}

fn parse(value: serde_json::Value) -> ParsedEmail {
    let message: GmailMessage = serde_json::from_value(value).unwrap();
    MessageParser::default().parse(&message).unwrap()
}

fn nested_message() -> GmailMessage {
    serde_json::from_str(NESTED_MESSAGE).unwrap()
}

#[test]
fn test_nested_fixture_flattens() {
    let email = MessageParser::default().parse(&nested_message()).unwrap();

    assert_eq!(email.id.as_str(), "18f2a1c9d3e4b5a6");
    assert_eq!(email.thread_id.as_str(), "18f2a1c9d3e4b5a0");
    assert_eq!(email.subject, "Planning meeting");
    assert_eq!(email.from, "Ann Lee <ann@example.com>");
    assert_eq!(email.message_id, "<CAF123@mail.example.com>");
    assert_eq!(email.text_body, "Agenda attached. Diagram: é");
    assert_eq!(
        email.html_body,
        "<p>Agenda attached.</p><img src=\"cid:ii_diagram\">"
    );

    let attachments: Vec<_> = email.attachments.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(attachments, vec!["a.pdf", "invite.ics"]);
    assert_eq!(email.attachments[0].attachment_id(), Some("ANGjdJ_pdf"));
    assert_eq!(email.attachments[0].size, 20480);

    assert_eq!(email.inline_images.len(), 1);
    let diagram = email.inline_image("cid:ii_diagram").unwrap();
    assert_eq!(diagram.filename, "b.png");
    assert!(diagram.is_inline);

    assert!(email.has_attachments);
    assert!(email.has_inline_images);
    assert!(email.has_label("UNREAD"));
}

#[test]
fn test_parsed_email_json_contract() {
    let email = MessageParser::default().parse(&nested_message()).unwrap();
    let json = serde_json::to_value(&email).unwrap();

    for field in [
        "id",
        "threadId",
        "subject",
        "from",
        "to",
        "date",
        "messageId",
        "snippet",
        "labelIds",
        "htmlBody",
        "textBody",
        "attachments",
        "inlineImages",
        "hasAttachments",
        "hasInlineImages",
    ] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["id"], "18f2a1c9d3e4b5a6");
    assert_eq!(json["inlineImages"][0]["contentId"], "ii_diagram");
    assert_eq!(json["attachments"][1]["attachmentId"], "ANGjdJ_ics");
}

#[test]
fn test_html_and_plain_are_independent() {
    let email = parse(json!({
        "id": "m1",
        "threadId": "t1",
        "payload": {
            "mimeType": "multipart/alternative",
            "parts": [
                { "mimeType": "text/plain", "body": { "data": b64("plain") } },
                { "mimeType": "text/html", "body": { "data": b64("<p>html</p>") } }
            ]
        }
    }));

    assert_eq!(email.text_body, "plain");
    assert_eq!(email.html_body, "<p>html</p>");
}

#[test]
fn test_html_only_message() {
    let email = parse(json!({
        "id": "m1",
        "threadId": "t1",
        "payload": {
            "mimeType": "text/html",
            "headers": [{ "name": "Subject", "value": "Newsletter" }],
            "body": { "data": b64("<h1>News</h1>") }
        }
    }));

    assert_eq!(email.subject, "Newsletter");
    assert_eq!(email.html_body, "<h1>News</h1>");
    assert_eq!(email.text_body, "");
}

#[test]
fn test_degrades_gracefully() {
    let email = parse(json!({
        "id": "m1",
        "threadId": "t1",
        "payload": {
            "mimeType": "multipart/mixed",
            "parts": [
                { "mimeType": "text/plain", "body": { "data": "@@not-base64@@" } },
                { "mimeType": "text/plain", "body": { "data": b64("survivor") } },
                { "mimeType": "application/octet-stream", "body": { "size": 3 } },
                { "body": null },
                {}
            ]
        }
    }));

    assert_eq!(email.text_body, "survivor");
    assert_eq!(email.subject, "No Subject");
    assert_eq!(email.from, "Unknown Sender");
    assert!(email.attachments.is_empty());
}

#[test]
fn test_alternatives_are_concatenated_by_default() {
    let payload = json!({
        "id": "m1",
        "threadId": "t1",
        "payload": {
            "mimeType": "multipart/mixed",
            "parts": [
                {
                    "mimeType": "multipart/alternative",
                    "parts": [
                        { "mimeType": "text/html", "body": { "data": b64("<p>a</p>") } },
                        { "mimeType": "text/html", "body": { "data": b64("<p>b</p>") } }
                    ]
                },
                { "mimeType": "text/html", "body": { "data": b64("<p>c</p>") } }
            ]
        }
    });

    let message: GmailMessage = serde_json::from_value(payload).unwrap();
    let concatenated = MessageParser::default().parse(&message).unwrap();
    assert_eq!(concatenated.html_body, "<p>a</p><p>b</p><p>c</p>");

    let config = MailConfig::from_json(r#"{ "bodyPolicy": "prefer-html" }"#).unwrap();
    let selected = MessageParser::from(&config).parse(&message).unwrap();
    assert_eq!(selected.html_body, "<p>a</p><p>c</p>");
}

#[test]
fn test_deep_nesting_is_rejected() {
    let mut part = json!({ "mimeType": "text/plain", "body": { "data": b64("deep") } });
    for _ in 0..60 {
        part = json!({ "mimeType": "multipart/mixed", "parts": [part] });
    }
    let message: GmailMessage =
        serde_json::from_value(json!({ "id": "m1", "threadId": "t1", "payload": part })).unwrap();

    let err = MessageParser::default().parse(&message).unwrap_err();
    assert_eq!(err, MailError::NestingTooDeep { limit: 50 });

    let lenient = MessageParser::with_options(100, BodyPolicy::Concatenate);
    assert_eq!(lenient.parse(&message).unwrap().text_body, "deep");
}

#[test]
fn test_parse_all_matches_sequential_parse() {
    let messages = vec![nested_message(), nested_message(), GmailMessage::default()];
    let parser = MessageParser::default();

    let results = parser.parse_all(&messages);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().attachments,
        parser.parse(&messages[0]).unwrap().attachments
    );
    assert!(matches!(results[2], Err(MailError::MalformedInput(_))));
}

#[test]
fn test_compose_decodes_to_rfc2822() {
    let input = ComposeInput::new("a@b.com", "Hi", "<p>hello</p>").from_address("me@b.com");
    let raw = RawMessageBuilder::default().build(&input).unwrap();

    let text = decode_body(raw.as_str()).unwrap();
    let to = text.find("To: a@b.com\n").unwrap();
    let subject = text.find("Subject: Hi\n").unwrap();
    assert!(to < subject);
    assert!(!text.contains("Cc:"));
    assert!(!text.contains("Bcc:"));
    assert!(text.contains("\nContent-Transfer-Encoding: quoted-printable\n\n<p>hello</p>"));
}

#[test]
fn test_compose_validation_names_field() {
    let err = RawMessageBuilder::default()
        .build(&ComposeInput::new("", "s", "m"))
        .unwrap_err();
    assert_eq!(err.field(), Some("to"));
    assert_eq!(err.to_string(), "Missing required field: to");
}

#[test]
fn test_composed_html_parses_back() {
    let input = ComposeInput::new("a@b.com", "Round trip", "<p>ünïcode</p>")
        .from_address("me@b.com");
    let builder = RawMessageBuilder::new(TransferEncoding::Verbatim);
    let text = builder.render(&input).unwrap();
    let (_, body) = text.split_once("\n\n").unwrap();

    let email = parse(json!({
        "id": "sent1",
        "threadId": "sent1",
        "labelIds": ["SENT"],
        "payload": {
            "mimeType": "text/html",
            "headers": [
                { "name": "To", "value": "a@b.com" },
                { "name": "Subject", "value": "Round trip" }
            ],
            "body": { "data": b64(body) }
        }
    }));

    assert_eq!(email.html_body, "<p>ünïcode</p>");
    assert!(email.has_label("SENT"));
}
