//! Configuration loading for mail services
//!
//! Two files live in the Quill config directory:
//! - `mail.json`: parser and composer options ([`MailConfig`])
//! - `gmail-tokens.json`: the session's access token ([`SessionTokens`])
//!
//! Environment variables take precedence over files where noted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::mime::{BodyPolicy, DEFAULT_MAX_DEPTH, TransferEncoding};

/// Mail options filename in the Quill config directory
const MAIL_CONFIG_FILE: &str = "mail.json";
/// Session token filename in the Quill config directory
const TOKENS_FILE: &str = "gmail-tokens.json";

/// Overrides `fromAddress`
const FROM_ENV: &str = "QUILL_FROM";
/// Overrides the stored access token
const ACCESS_TOKEN_ENV: &str = "GMAIL_ACCESS_TOKEN";

/// Options for parsing and composing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailConfig {
    /// Deepest MIME nesting accepted when parsing
    pub max_depth: usize,
    /// How alternative bodies are combined
    pub body_policy: BodyPolicy,
    /// How outgoing HTML bodies are encoded
    pub transfer_encoding: TransferEncoding,
    /// Sender address for outgoing mail; empty means "ask Gmail"
    pub from_address: String,
    /// Messages fetched per list page
    pub page_size: usize,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            body_policy: BodyPolicy::default(),
            transfer_encoding: TransferEncoding::default(),
            from_address: String::new(),
            page_size: 20,
        }
    }
}

impl MailConfig {
    /// Load options using the following priority:
    /// 1. `~/.config/quill/mail.json`, falling back to defaults when absent
    /// 2. `QUILL_FROM` overrides the sender address
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref(), env_var)
    }

    /// Load options from `path` (defaults when absent), then apply overrides
    /// read through `env`.
    pub fn load_from(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = match path {
            Some(path) => config::load_json_file_opt::<Self>(path)?.unwrap_or_default(),
            None => Self::default(),
        };
        Ok(config.with_env_overrides_from(env))
    }

    /// Load options from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = config::load_json_file(path)?;
        Ok(config.with_env_overrides_from(env_var))
    }

    /// Parse options from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse mail config JSON")
    }

    /// Write these options as JSON to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        config::save_json_file(path, self)
    }

    /// Get the default options file path
    pub fn default_path() -> Option<PathBuf> {
        config::config_path(MAIL_CONFIG_FILE)
    }

    /// Apply `QUILL_FROM`; blank values are ignored
    pub fn with_env_overrides_from(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(from) = env(FROM_ENV)
            && !from.trim().is_empty()
        {
            self.from_address = from;
        }
        self
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Tokens of an authenticated Gmail session
///
/// Obtaining and refreshing them is the caller's business; the mail crate
/// only sends the access token as a bearer credential.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Load tokens using the following priority:
    /// 1. `GMAIL_ACCESS_TOKEN` environment variable
    /// 2. `~/.config/quill/gmail-tokens.json`
    pub fn load() -> Result<Self> {
        Self::load_with(env_var, Self::default_tokens_path().as_deref())
    }

    /// [`SessionTokens::load`] with an explicit environment and token file
    pub fn load_with(
        env: impl Fn(&str) -> Option<String>,
        tokens_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(tokens) = Self::from_env_with(env) {
            return Ok(tokens);
        }

        let stored = match tokens_path {
            Some(path) => config::load_json_file_opt::<Self>(path)?,
            None => None,
        };
        stored.with_context(|| {
            format!(
                "No Gmail session: set {} or write {}",
                ACCESS_TOKEN_ENV,
                tokens_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| TOKENS_FILE.to_string())
            )
        })
    }

    /// Load tokens from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Read the access token through `env`; blank values count as unset
    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Option<Self> {
        env(ACCESS_TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
    }

    /// Get the default token file path
    pub fn default_tokens_path() -> Option<PathBuf> {
        config::config_path(TOKENS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = MailConfig::from_json(r#"{ "bodyPolicy": "prefer-html" }"#).unwrap();
        assert_eq!(config.body_policy, BodyPolicy::PreferHtml);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.transfer_encoding, TransferEncoding::Verbatim);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "maxDepth": 12,
            "bodyPolicy": "concatenate",
            "transferEncoding": "quoted-printable",
            "fromAddress": "me@example.com",
            "pageSize": 50
        }"#;

        let config = MailConfig::from_json(json).unwrap();
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.transfer_encoding, TransferEncoding::QuotedPrintable);
        assert_eq!(config.from_address, "me@example.com");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_invalid_policy() {
        assert!(MailConfig::from_json(r#"{ "bodyPolicy": "best" }"#).is_err());
    }

    #[test]
    fn test_tokens_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, r#"{ "accessToken": "ya29.a0", "refreshToken": "1//0g" }"#).unwrap();

        let tokens = SessionTokens::from_file(&path).unwrap();
        assert_eq!(tokens.access_token, "ya29.a0");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//0g"));
    }

    fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_env_overrides_file_sender() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mail.json");
        std::fs::write(&path, r#"{ "fromAddress": "file@example.com", "pageSize": 5 }"#).unwrap();

        let config =
            MailConfig::load_from(Some(&path), env_of(&[("QUILL_FROM", "env@example.com")]))
                .unwrap();
        assert_eq!(config.from_address, "env@example.com");
        assert_eq!(config.page_size, 5);

        let config = MailConfig::load_from(Some(&path), env_of(&[])).unwrap();
        assert_eq!(config.from_address, "file@example.com");
    }

    #[test]
    fn test_blank_from_env_is_ignored() {
        let config = MailConfig {
            from_address: "file@example.com".to_string(),
            ..Default::default()
        }
        .with_env_overrides_from(env_of(&[("QUILL_FROM", "   ")]));
        assert_eq!(config.from_address, "file@example.com");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            MailConfig::load_from(Some(&dir.path().join("mail.json")), env_of(&[])).unwrap();
        assert_eq!(config, MailConfig::default());
    }

    #[test]
    fn test_save_and_reload_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill").join("mail.json");
        let config = MailConfig {
            body_policy: BodyPolicy::PreferHtml,
            page_size: 7,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        let loaded = MailConfig::load_from(Some(&path), env_of(&[])).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_token_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gmail-tokens.json");
        std::fs::write(&path, r#"{ "accessToken": "from-file" }"#).unwrap();

        let tokens =
            SessionTokens::load_with(env_of(&[("GMAIL_ACCESS_TOKEN", "from-env")]), Some(&path))
                .unwrap();
        assert_eq!(tokens.access_token, "from-env");

        let tokens = SessionTokens::load_with(env_of(&[]), Some(&path)).unwrap();
        assert_eq!(tokens.access_token, "from-file");

        let tokens =
            SessionTokens::load_with(env_of(&[("GMAIL_ACCESS_TOKEN", "  ")]), Some(&path))
                .unwrap();
        assert_eq!(tokens.access_token, "from-file");
    }

    #[test]
    fn test_no_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gmail-tokens.json");

        let err = SessionTokens::load_with(env_of(&[]), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("GMAIL_ACCESS_TOKEN"));
        assert!(SessionTokens::load_with(env_of(&[]), None).is_err());
    }

    #[test]
    fn test_tokens_debug_is_redacted() {
        let tokens = SessionTokens::new("secret-token");
        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("secret-token"));
    }
}
