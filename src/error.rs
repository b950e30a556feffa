//! Error types for wikibook operations.

use thiserror::Error;

/// Errors that can occur while assembling or saving a book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The page source has no page for this URL.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[cfg(feature = "cli")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
