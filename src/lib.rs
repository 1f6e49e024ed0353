//! Placement-Bot: a chat bot for freshman placement lookups
//!
//! This crate fetches a student's placement page from the university portal,
//! extracts the result table, and formats a chat reply. The chat transport is
//! a seam ([`bot::ChatSession`]); a Telegram long-polling adapter is included.

pub mod bot;
pub mod config;
pub mod portal;
pub mod state;
pub mod telegram;

use thiserror::Error;

/// Main error type for Placement-Bot operations
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Portal error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Chat error: {0}")]
    Chat(#[from] bot::ChatError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No bot token configured (set BOT_TOKEN, --token or [bot].token)")]
    MissingToken,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a page from the portal
///
/// Each variant corresponds to one user-facing message; see
/// [`FetchError::kind`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Cannot connect to {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request failed for {url}: {source}")]
    Unclassified { url: String, source: reqwest::Error },
}

/// Coarse classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Transport,
    HttpStatus(u16),
    Unclassified,
}

impl FetchError {
    /// Classifies this error for reply selection
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout { .. } => FailureKind::Timeout,
            FetchError::Transport { .. } => FailureKind::Transport,
            FetchError::HttpStatus { status, .. } => FailureKind::HttpStatus(*status),
            FetchError::Unclassified { .. } => FailureKind::Unclassified,
        }
    }
}

/// Result type alias for Placement-Bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Result type alias for portal fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use bot::{Dispatcher, DispatchOutcome, InboundMessage, Reply};
pub use config::Config;
pub use portal::{extract_record, PlacementRecord, PortalClient};
pub use state::DedupGuard;
