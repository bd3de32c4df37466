use std::time::Duration;

/// Core error type.
///
/// Adapter crates map their transport errors into this type so the update loop can tell fatal
/// failures (bad config, rejected token) apart from ones it should ride out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("rate limited{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors expected to clear up on their own (connectivity, server hiccups, flood control).
    ///
    /// Anything else (a revoked token, bad config, local i/o) needs an operator.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Protocol(_) | Error::RateLimited { .. }
        )
    }

    /// Server-requested wait, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(" (retry after {}s)", d.as_secs()))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
