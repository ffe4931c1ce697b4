//! Error type for the textanchor facade.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Failing to find text is
//! never an error; these variants cover collaborator failures and bad
//! configuration.

use textanchor_core::CoreError;
use thiserror::Error;

/// Errors raised while loading pages, placing overlays, or reading settings.
#[derive(Debug, Error)]
pub enum Error {
    /// A core value was rejected (e.g. page number 0).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The configured item row pattern is not a valid regular expression.
    #[error("invalid item row pattern: {0}")]
    InvalidRowPattern(#[from] regex::Error),

    /// A page outside `1..=page_count` was requested.
    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: usize },

    /// The fragment source failed to produce a page.
    #[error("fragment source error: {0}")]
    Source(String),

    /// The overlay sink rejected a drawing command.
    #[error("overlay sink error: {0}")]
    Sink(String),

    /// Error reading input data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
