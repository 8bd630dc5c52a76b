//! OCR engine interface.
//!
//! The OCR model itself lives outside this crate. The aggregator only needs
//! one call per page image returning the recognized text and how long it
//! took, or an error message. Implement [`OcrEngine`] to plug in a model.
//!
//! # Example
//!
//! ```
//! use metsocr::engine::{OcrEngine, OcrError, OcrOutput};
//! use std::path::Path;
//!
//! struct EchoEngine;
//!
//! impl OcrEngine for EchoEngine {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn recognize(&self, image: &Path) -> Result<OcrOutput, OcrError> {
//!         Ok(OcrOutput::new(image.display().to_string(), 0.0))
//!     }
//! }
//! ```

mod command;
mod sidecar;

pub use command::CommandEngine;
pub use sidecar::SidecarEngine;

use std::path::Path;
use thiserror::Error;

/// Text recognized on one page image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    /// Recognized text
    pub text: String,

    /// Wall-clock recognition time in seconds
    pub elapsed_seconds: f64,
}

impl OcrOutput {
    /// Create a new OCR output.
    pub fn new(text: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            text: text.into(),
            elapsed_seconds,
        }
    }
}

/// Failure of the OCR engine on one page.
///
/// The message is stored verbatim on the failed page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct OcrError(pub String);

impl OcrError {
    /// Create a new OCR error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for OcrError {
    fn from(err: std::io::Error) -> Self {
        OcrError(err.to_string())
    }
}

/// Trait for OCR engines.
///
/// Engines are shared across worker threads, so implementations must be
/// `Send + Sync`.
pub trait OcrEngine: Send + Sync {
    /// Get the name of this engine.
    fn name(&self) -> &str;

    /// Recognize the text of one page image.
    fn recognize(&self, image: &Path) -> Result<OcrOutput, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &Path) -> Result<OcrOutput, OcrError> {
        (**self).recognize(image)
    }
}
