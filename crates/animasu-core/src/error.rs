//! Error types for the Animasu scraper
//!
//! `Display` carries the full cause so operators can log it. The serialized
//! form is always the generic failure message, so nothing about the upstream
//! site or the failing step leaks to API consumers.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Message exposed to callers for every pipeline failure.
pub const PUBLIC_FAILURE_MESSAGE: &str = "Internal Server Error";

/// Error type for Animasu scraper operations
#[derive(Error, Debug)]
pub enum AnimasuError {
    /// Transport-level failure talking to the upstream site
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream returned 404
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Upstream returned 429
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Upstream returned any other non-success status
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// A selector or document could not be parsed
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Caller supplied an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Page numbers are 1-based
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),
}

impl AnimasuError {
    /// The message safe to hand to an API consumer.
    pub fn public_message(&self) -> &'static str {
        PUBLIC_FAILURE_MESSAGE
    }
}

/// Serialize every variant as the opaque public message.
impl Serialize for AnimasuError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.public_message())
    }
}

/// Result type alias for Animasu scraper operations
pub type Result<T> = std::result::Result<T, AnimasuError>;
