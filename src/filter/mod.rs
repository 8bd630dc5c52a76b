//! Artifact filtering for OCR text.
//!
//! Scanned archival material routinely carries color charts, gray scales,
//! rulers and institutional stamps next to the actual document. OCR engines
//! transcribe those faithfully, so this module removes them again:
//!
//! - [`classify_line`] decides whether a single line is scan noise,
//! - [`is_empty_page`] decides whether a whole page holds no real content,
//! - [`TextCleaner`] combines both into the per-page cleaning step.

mod cleaner;
mod line;
mod page;
mod stats;

pub use cleaner::{clean_text, CleanOptions, CleanedText, TextCleaner, EMPTY_PAGE_SENTINEL};
pub use line::{
    classify_line, is_artifact_line, ArtifactReason, LineVerdict, ARTIFACT_KEYWORDS,
    ARTIFACT_PATTERNS,
};
pub use page::{is_empty_page, letter_count, MIN_LETTER_RATIO, MIN_PAGE_LETTERS};
pub use stats::FilterStats;
