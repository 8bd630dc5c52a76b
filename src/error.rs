//! Error types for metsocr library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for metsocr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing a document.
///
/// Only document-level failures are represented here. A page whose image is
/// missing or whose OCR step failed is recorded on the page itself and never
/// surfaces as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The manifest file does not exist.
    #[error("METS manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest is not well-formed XML.
    #[error("Manifest parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A physical page node carries an unusable identifier or order.
    #[error("Invalid page {page_id:?} in manifest: {reason}")]
    InvalidPage {
        /// Page identifier (empty when the ID attribute is missing)
        page_id: String,
        /// What is wrong with the node
        reason: String,
    },

    /// The manifest is readable but not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The page image directory does not exist.
    #[error("Images directory not found: {}", .0.display())]
    ImagesDirNotFound(PathBuf),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Error reading or writing a JSON document record.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
