//! Subcommand implementations

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use log::{info, warn};
use quill_mail::gmail::api::GmailMessage;
use quill_mail::{
    ComposeInput, GmailClient, MailConfig, MessageId, MessageParser, ParsedEmail,
    RawMessageBuilder, SessionTokens, labels,
};

use crate::cli::ComposeArgs;

/// Output settings shared by all commands
pub struct Output {
    pub compact: bool,
}

impl Output {
    fn json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        let text = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("{text}");
        Ok(())
    }
}

fn client() -> Result<GmailClient> {
    Ok(GmailClient::new(SessionTokens::load()?))
}

/// Write default mail options to `path` (or the default location)
pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => MailConfig::default_path().context("Could not determine config directory")?,
    };
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }

    MailConfig::default().save_to(&path)?;
    info!("Wrote default mail options to {}", path.display());
    Ok(path)
}

/// Parse a saved message offline
pub fn parse(path: &Path, config: &MailConfig, out: &Output) -> Result<()> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read message from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file: {}", path.display()))?
    };

    let message: GmailMessage =
        serde_json::from_str(&content).context("Failed to parse Gmail message JSON")?;
    let email = MessageParser::from(config).parse(&message)?;
    out.json(&email)
}

fn compose_input(args: &ComposeArgs, config: &MailConfig) -> Result<ComposeInput> {
    let message = match (&args.message, &args.message_file) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message body: {}", path.display()))?,
        (None, None) => String::new(),
    };

    let mut input = ComposeInput::new(&args.to, &args.subject, message)
        .from_address(args.from.clone().unwrap_or_else(|| config.from_address.clone()));
    input.cc = args.cc.clone();
    input.bcc = args.bcc.clone();
    Ok(input)
}

/// Print the raw value without sending
pub fn compose(args: &ComposeArgs, config: &MailConfig) -> Result<()> {
    let input = compose_input(args, config)?;
    if input.from_address.trim().is_empty() {
        warn!("No sender address configured; the From header will be empty");
    }
    let raw = RawMessageBuilder::new(config.transfer_encoding).build(&input)?;
    println!("{raw}");
    Ok(())
}

/// Compose and send
pub fn send(args: &ComposeArgs, config: &MailConfig, out: &Output) -> Result<()> {
    let input = compose_input(args, config)?;
    let sent = client()?.send(&input, config)?;
    out.json(&sent)
}

/// List and parse a page of messages
pub fn list(
    label: &str,
    query: Option<&str>,
    max: usize,
    page_token: Option<&str>,
    config: &MailConfig,
    out: &Output,
) -> Result<()> {
    let gmail = client()?;
    let page = gmail.list_messages(Some(label), query, max, page_token)?;
    let ids: Vec<MessageId> = page
        .messages
        .unwrap_or_default()
        .into_iter()
        .map(|m| MessageId::new(m.id))
        .collect();

    let mut messages = Vec::with_capacity(ids.len());
    for (id, result) in ids.iter().zip(gmail.get_messages_batch(&ids)) {
        match result {
            Ok(message) => messages.push(message),
            Err(e) => warn!("Skipping message {}: {:#}", id.as_str(), e),
        }
    }

    let parser = MessageParser::from(config);
    let emails: Vec<ParsedEmail> = parser
        .parse_all(&messages)
        .into_iter()
        .filter_map(|result| match result {
            Ok(email) => Some(email),
            Err(e) => {
                warn!("Skipping unparseable message: {}", e);
                None
            }
        })
        .collect();

    if out.compact {
        return out.json(&emails);
    }

    for email in &emails {
        println!("{}", summary_line(email));
    }
    if let Some(token) = page.next_page_token {
        println!("\nMore: quill list --label {} --page-token {}", label, token);
    }
    Ok(())
}

/// One line per message: unread marker, date, sender, subject, attachment marker
fn summary_line(email: &ParsedEmail) -> String {
    let unread = if email.has_label(labels::UNREAD) { "*" } else { " " };
    let clip = if email.has_attachments { " [+]" } else { "" };
    format!(
        "{} {:<16} {:<10} {:<30} {}{}",
        unread,
        email.id.as_str(),
        short_date(&email.date),
        truncate(&email.from, 30),
        email.subject,
        clip
    )
}

fn short_date(date: &str) -> String {
    DateTime::parse_from_rfc2822(date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| truncate(date, 10))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Fetch and print one message
pub fn show(id: &str, config: &MailConfig, out: &Output) -> Result<()> {
    let message = client()?.get_message(&MessageId::new(id))?;
    let email = MessageParser::from(config).parse(&message)?;
    out.json(&email)
}

/// Download an attachment to a file
pub fn attachment(message_id: &str, attachment_id: &str, path: &Path) -> Result<()> {
    let bytes = client()?.get_attachment(&MessageId::new(message_id), attachment_id)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write attachment: {}", path.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Label changes and trash
pub enum Organize {
    Archive,
    Trash,
    Read,
    Unread,
    Star,
    Unstar,
}

pub fn organize(action: Organize, id: &str) -> Result<()> {
    let gmail = client()?;
    let id = MessageId::new(id);
    match action {
        Organize::Archive => gmail.archive(&id),
        Organize::Trash => gmail.trash(&id),
        Organize::Read => gmail.mark_read(&id),
        Organize::Unread => gmail.mark_unread(&id),
        Organize::Star => gmail.star(&id),
        Organize::Unstar => gmail.unstar(&id),
    }
}
