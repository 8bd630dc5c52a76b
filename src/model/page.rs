//! Page-level types.

use serde::{Deserialize, Serialize};

/// One physical page as declared by the manifest's physical structure map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Physical page identifier (the `ID` of the page node)
    pub physical_id: String,

    /// Declared page order (1-based)
    pub order: u32,

    /// File reference of the page image (the `FILEID` of its pointer)
    pub file_id: String,

    /// Optional content identifier (`CONTENTIDS`)
    pub content_id: Option<String>,
}

impl PageDescriptor {
    /// Create a new page descriptor.
    pub fn new(physical_id: impl Into<String>, order: u32, file_id: impl Into<String>) -> Self {
        Self {
            physical_id: physical_id.into(),
            order,
            file_id: file_id.into(),
            content_id: None,
        }
    }

    /// Set the content identifier.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

/// Text and statistics of a successfully recognized page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Text as returned by the OCR engine
    pub raw_text: String,

    /// Text after artifact filtering
    pub cleaned_text: String,

    /// Character count of the (trimmed) raw text
    pub original_characters: usize,

    /// Character count of the cleaned text
    pub cleaned_characters: usize,

    /// Wall-clock OCR time in seconds
    pub elapsed_seconds: f64,
}

impl PageText {
    /// Characters removed by filtering.
    ///
    /// Negative when an empty page was replaced by the (longer) sentinel.
    pub fn filtered_count(&self) -> i64 {
        self.original_characters as i64 - self.cleaned_characters as i64
    }
}

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// OCR succeeded and the text was cleaned
    Succeeded(PageText),

    /// OCR (or image lookup) failed
    Failed {
        /// Error description
        error: String,
    },
}

/// OCR and cleaning result for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page order taken from the descriptor
    pub order: u32,

    /// Physical page identifier
    pub physical_id: String,

    /// File reference from the manifest
    pub file_id: String,

    /// File name of the located image, if one was found
    pub image_file: Option<String>,

    /// Page outcome
    pub outcome: PageOutcome,
}

impl PageResult {
    /// Create a succeeded page result.
    pub fn succeeded(descriptor: &PageDescriptor, image_file: impl Into<String>, text: PageText) -> Self {
        Self {
            order: descriptor.order,
            physical_id: descriptor.physical_id.clone(),
            file_id: descriptor.file_id.clone(),
            image_file: Some(image_file.into()),
            outcome: PageOutcome::Succeeded(text),
        }
    }

    /// Create a failed page result.
    pub fn failed(
        descriptor: &PageDescriptor,
        image_file: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            order: descriptor.order,
            physical_id: descriptor.physical_id.clone(),
            file_id: descriptor.file_id.clone(),
            image_file,
            outcome: PageOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// Check if the page was recognized successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PageOutcome::Succeeded(_))
    }

    /// Text and statistics, if the page succeeded.
    pub fn text(&self) -> Option<&PageText> {
        match &self.outcome {
            PageOutcome::Succeeded(text) => Some(text),
            PageOutcome::Failed { .. } => None,
        }
    }

    /// Error description, if the page failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Succeeded(_) => None,
            PageOutcome::Failed { error } => Some(error),
        }
    }
}
