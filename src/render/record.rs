//! Serializable document record.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::filter::TextCleaner;
use crate::model::{DocumentMetadata, DocumentResult, LogicalLinks, LogicalSection, PageResult};

/// One page of a [`DocumentRecord`].
///
/// Succeeded pages carry `text` and the statistics fields, failed pages
/// carry `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page order
    pub page: u32,

    /// File reference from the manifest
    pub file_id: String,

    /// File name of the page image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_file: Option<String>,

    /// Cleaned page text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Characters of the trimmed OCR output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<usize>,

    /// Characters before cleaning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_characters: Option<usize>,

    /// Characters after cleaning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned_characters: Option<usize>,

    /// Characters removed by cleaning (negative for the empty-page sentinel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<i64>,

    /// OCR time in seconds, rounded to two decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,

    /// Error description of a failed page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&PageResult> for PageRecord {
    fn from(page: &PageResult) -> Self {
        let text = page.text();
        Self {
            page: page.order,
            file_id: page.file_id.clone(),
            image_file: page.image_file.clone(),
            text: text.map(|t| t.cleaned_text.clone()),
            characters: text.map(|t| t.original_characters),
            original_characters: text.map(|t| t.original_characters),
            cleaned_characters: text.map(|t| t.cleaned_characters),
            filtered: text.map(|t| t.filtered_count()),
            time_seconds: text.map(|t| round_seconds(t.elapsed_seconds)),
            error: page.error().map(String::from),
        }
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// The exported form of a [`DocumentResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Bibliographic metadata
    #[serde(default)]
    pub mets_metadata: DocumentMetadata,

    /// Logical sections
    #[serde(default)]
    pub logical_structure: Vec<LogicalSection>,

    /// Logical-to-physical links
    #[serde(default, skip_serializing_if = "LogicalLinks::is_empty")]
    pub logical_to_physical: LogicalLinks,

    /// Page records in page order
    pub pages: Vec<PageRecord>,

    /// Number of pages
    pub total_pages: usize,

    /// Number of succeeded pages
    pub successful: usize,

    /// Number of failed pages
    pub failed: usize,
}

impl From<&DocumentResult> for DocumentRecord {
    fn from(doc: &DocumentResult) -> Self {
        Self {
            mets_metadata: doc.metadata().clone(),
            logical_structure: doc.logical_sections().to_vec(),
            logical_to_physical: doc.logical_to_physical().clone(),
            pages: doc.pages().iter().map(PageRecord::from).collect(),
            total_pages: doc.total_pages(),
            successful: doc.successful_count(),
            failed: doc.failed_count(),
        }
    }
}

impl DocumentRecord {
    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a record from a JSON file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Document title, if known.
    pub fn title(&self) -> Option<&str> {
        self.mets_metadata.title.as_deref()
    }

    /// Apply the cleaner again to every page with text.
    ///
    /// `original_characters` is taken from the page's `characters` (0 when
    /// absent), the cleaned count and `filtered` are recomputed.
    pub fn recleaned(mut self, cleaner: &TextCleaner) -> Self {
        for page in &mut self.pages {
            let Some(text) = page.text.as_deref() else {
                continue;
            };

            let cleaned = cleaner.clean(text);
            let original = page.characters.unwrap_or(0);
            let cleaned_count = cleaned.chars().count();

            page.original_characters = Some(original);
            page.cleaned_characters = Some(cleaned_count);
            page.filtered = Some(original as i64 - cleaned_count as i64);
            page.text = Some(cleaned);
        }
        self
    }
}
