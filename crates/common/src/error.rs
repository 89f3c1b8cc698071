//! Unified error type for the dashboard client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::Timeout { url, timeout_ms } => Error::Timeout {
                url: url.clone(),
                timeout_ms: *timeout_ms,
            },
            Error::Http { status, url } => Error::Http {
                status: *status,
                url: url.clone(),
            },
            Error::Transport(message) => Error::Transport(message.clone()),
            Error::Decode { url, message } => Error::Decode {
                url: url.clone(),
                message: message.clone(),
            },
            Error::Url(message) => Error::Url(message.clone()),
            Error::Config(message) => Error::Config(message.clone()),
            Error::Json(e) => Error::Json(<serde_json::Error as serde::de::Error>::custom(e.to_string())),
            Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), e.to_string())),
        }
    }
}

impl Error {
    /// True for failures the cached fetcher may answer from a stale entry.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Timeout { .. } | Error::Http { .. } | Error::Transport(_) | Error::Decode { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
