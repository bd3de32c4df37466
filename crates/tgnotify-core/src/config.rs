use std::{env, fmt, fs, path::Path};

use crate::{backoff::BackoffConfig, errors::Error, poller::PollConfig, Result};

pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
pub const TOKEN_FILE: &str = ".token";
pub const API_URL_ENV: &str = "TELEGRAM_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot token. Never printed: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Config("bot token is empty".to_string()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(Error::Config("bot token contains whitespace".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

/// Runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: BotToken,
    pub api_url: String,
    pub poll: PollConfig,
    pub backoff: BackoffConfig,
}

impl Config {
    /// Load from the process environment, an optional `.env`, and `.token` in the working dir.
    ///
    /// May set environment variables from `.env`, so call it before starting any threads
    /// (including the tokio runtime).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let token = resolve_token(env_str(TOKEN_ENV), Path::new(TOKEN_FILE))?;
        let api_url = env_str(API_URL_ENV)
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self::new(token, api_url))
    }

    pub fn new(token: BotToken, api_url: impl Into<String>) -> Self {
        Self {
            token,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            poll: PollConfig::default(),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Token from the environment value if set, else the first word of `token_file`.
pub fn resolve_token(env_value: Option<String>, token_file: &Path) -> Result<BotToken> {
    if let Some(v) = env_value.and_then(non_empty) {
        return BotToken::new(v);
    }

    let contents = fs::read_to_string(token_file).map_err(|e| {
        Error::Config(format!(
            "{TOKEN_ENV} is not set and {} could not be read: {e}",
            token_file.display()
        ))
    })?;

    let Some(word) = contents.split_whitespace().next() else {
        return Err(Error::Config(format!(
            "{} does not contain a token",
            token_file.display()
        )));
    };
    BotToken::new(word)
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Export `.env` entries that are not already set.
///
/// Mutates the process environment: only call while the process is single-threaded.
fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_none() {
            env::set_var(key, val);
        }
    }
}

/// `KEY=value` lines; blank lines, `#` comments and lines without a key are skipped.
fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter_map(|(k, v)| {
            let key = k.trim();
            (!key.is_empty()).then(|| (key.to_string(), unquote(v.trim()).to_string()))
        })
        .collect()
}

fn unquote(v: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = v.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)) {
            return inner;
        }
    }
    v
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
