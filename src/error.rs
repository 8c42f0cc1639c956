//! Error types for the REST client, the feed loader and settings persistence.

use thiserror::Error;

/// A failed call against the REST backend (listing, user lookup, or any mutation)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("network: {0}")]
    Network(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("not logged in")]
    Unauthenticated,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// The render sink is missing the container it needs to place a node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("render precondition failed: {0}")]
pub struct RenderPreconditionError(pub String);

/// Anything the feed loader hands to its error reporter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderPreconditionError),
}

/// Failures loading or storing local settings and the saved session
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration directory available")]
    NoConfigDir,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("keyring: {0}")]
    Keyring(#[from] keyring::Error),
}
