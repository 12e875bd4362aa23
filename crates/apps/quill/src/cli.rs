//! Command-line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quill", version, about = "Read, send and organize Gmail from the terminal")]
pub struct Cli {
    /// Mail options file (defaults to ~/.config/quill/mail.json)
    #[arg(long, global = true, env = "QUILL_MAIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a default mail options file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Parse a saved `messages.get(format=full)` response ("-" for stdin)
    Parse { file: PathBuf },
    /// Print the base64url raw value for a message without sending it
    Compose(ComposeArgs),
    /// List messages
    List {
        /// Only messages with this label
        #[arg(long, default_value = "INBOX")]
        label: String,
        /// Gmail search query
        #[arg(long, short)]
        query: Option<String>,
        /// Number of messages (defaults to the configured page size)
        #[arg(long)]
        max: Option<usize>,
        /// Continue from a previous page
        #[arg(long)]
        page_token: Option<String>,
    },
    /// Fetch and print one message
    Show { id: String },
    /// Compose and send a message
    Send(ComposeArgs),
    /// Download an attachment
    Attachment {
        message_id: String,
        attachment_id: String,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Remove a message from the inbox
    Archive { id: String },
    /// Move a message to the trash
    Trash { id: String },
    /// Mark a message as read
    Read { id: String },
    /// Mark a message as unread
    Unread { id: String },
    /// Star a message
    Star { id: String },
    /// Remove the star from a message
    Unstar { id: String },
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub subject: String,
    /// HTML body
    #[arg(long, conflicts_with = "message_file", required_unless_present = "message_file")]
    pub message: Option<String>,
    /// Read the HTML body from a file
    #[arg(long)]
    pub message_file: Option<PathBuf>,
    #[arg(long)]
    pub cc: Option<String>,
    #[arg(long)]
    pub bcc: Option<String>,
    /// Sender address (defaults to the configured or account address)
    #[arg(long)]
    pub from: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compose_args() {
        let cli = Cli::try_parse_from([
            "quill", "compose", "--to", "a@b.com", "--subject", "Hi", "--message", "<p>x</p>",
            "--cc", "c@b.com",
        ])
        .unwrap();

        match cli.command {
            Command::Compose(args) => {
                assert_eq!(args.to, "a@b.com");
                assert_eq!(args.message.as_deref(), Some("<p>x</p>"));
                assert_eq!(args.cc.as_deref(), Some("c@b.com"));
                assert!(args.bcc.is_none());
            }
            other => panic!("Expected Compose, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_needs_a_body() {
        let result = Cli::try_parse_from(["quill", "send", "--to", "a@b.com", "--subject", "Hi"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_init_with_config_path() {
        let cli =
            Cli::try_parse_from(["quill", "init", "--force", "--config", "/tmp/mail.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mail.json")));
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn test_list_defaults_to_inbox() {
        let cli = Cli::try_parse_from(["quill", "list"]).unwrap();
        match cli.command {
            Command::List { label, max, .. } => {
                assert_eq!(label, "INBOX");
                assert!(max.is_none());
            }
            other => panic!("Expected List, got {:?}", other),
        }
    }
}
