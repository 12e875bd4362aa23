//! Quill - read, send and organize Gmail from the terminal
//!
//! Thin front end over the `quill-mail` crate. Parsing and composing work
//! offline; everything else needs an access token (`GMAIL_ACCESS_TOKEN` or
//! `~/.config/quill/gmail-tokens.json`).

use anyhow::Result;
use clap::Parser;
use log::error;
use quill_mail::MailConfig;

mod cli;
mod commands;

use cli::{Cli, Command};
use commands::{Organize, Output};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    if let Command::Init { force } = cli.command {
        let path = commands::init(cli.config.as_deref(), force)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mail_config = match &cli.config {
        Some(path) => MailConfig::from_file(path)?,
        None => MailConfig::load()?,
    };
    let out = Output {
        compact: cli.compact,
    };

    match cli.command {
        Command::Init { .. } => Ok(()),
        Command::Parse { file } => commands::parse(&file, &mail_config, &out),
        Command::Compose(args) => commands::compose(&args, &mail_config),
        Command::Send(args) => commands::send(&args, &mail_config, &out),
        Command::List {
            label,
            query,
            max,
            page_token,
        } => commands::list(
            &label,
            query.as_deref(),
            max.unwrap_or(mail_config.page_size),
            page_token.as_deref(),
            &mail_config,
            &out,
        ),
        Command::Show { id } => commands::show(&id, &mail_config, &out),
        Command::Attachment {
            message_id,
            attachment_id,
            out: path,
        } => commands::attachment(&message_id, &attachment_id, &path),
        Command::Archive { id } => commands::organize(Organize::Archive, &id),
        Command::Trash { id } => commands::organize(Organize::Trash, &id),
        Command::Read { id } => commands::organize(Organize::Read, &id),
        Command::Unread { id } => commands::organize(Organize::Unread, &id),
        Command::Star { id } => commands::organize(Organize::Star, &id),
        Command::Unstar { id } => commands::organize(Organize::Unstar, &id),
    }
}
