//! Document-level types.

use super::{LogicalLinks, LogicalSection, PageDescriptor, PageResult};
use serde::{Deserialize, Serialize};

/// Bibliographic metadata from the manifest.
///
/// Every field is optional; the parser never substitutes a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author display form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Shelf mark / signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Rights owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Persistent identifier (URN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
}

impl DocumentMetadata {
    /// Check if no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.signature.is_none()
            && self.language.is_none()
            && self.owner.is_none()
            && self.urn.is_none()
    }
}

/// Everything the manifest parser extracts from a METS document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Bibliographic metadata
    pub metadata: DocumentMetadata,

    /// Physical pages, sorted ascending by order
    pub pages: Vec<PageDescriptor>,

    /// Logical sections in document order
    pub logical_sections: Vec<LogicalSection>,

    /// Logical-to-physical links
    pub logical_to_physical: LogicalLinks,
}

impl Manifest {
    /// Get the number of physical pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page descriptor by its physical id.
    pub fn page(&self, physical_id: &str) -> Option<&PageDescriptor> {
        self.pages.iter().find(|p| p.physical_id == physical_id)
    }
}

/// The assembled, page-ordered result for one document.
///
/// Counts are derived from the page list on construction, so
/// `total_pages() == pages().len()` and
/// `successful_count() + failed_count() == total_pages()` always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResult {
    metadata: DocumentMetadata,
    logical_sections: Vec<LogicalSection>,
    logical_to_physical: LogicalLinks,
    pages: Vec<PageResult>,
    successful_count: usize,
    failed_count: usize,
}

impl DocumentResult {
    /// Assemble a document result from its parts.
    pub fn new(
        metadata: DocumentMetadata,
        logical_sections: Vec<LogicalSection>,
        logical_to_physical: LogicalLinks,
        pages: Vec<PageResult>,
    ) -> Self {
        let successful_count = pages.iter().filter(|p| p.is_success()).count();
        let failed_count = pages.len() - successful_count;

        Self {
            metadata,
            logical_sections,
            logical_to_physical,
            pages,
            successful_count,
            failed_count,
        }
    }

    /// Document metadata.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Logical sections.
    pub fn logical_sections(&self) -> &[LogicalSection] {
        &self.logical_sections
    }

    /// Logical-to-physical links.
    pub fn logical_to_physical(&self) -> &LogicalLinks {
        &self.logical_to_physical
    }

    /// Page results, ascending by order.
    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    /// Get a page by its order value.
    pub fn page(&self, order: u32) -> Option<&PageResult> {
        self.pages.iter().find(|p| p.order == order)
    }

    /// Number of pages in the result.
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Number of succeeded pages.
    pub fn successful_count(&self) -> usize {
        self.successful_count
    }

    /// Number of failed pages.
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Total characters removed by filtering across succeeded pages.
    pub fn filtered_total(&self) -> i64 {
        self.pages
            .iter()
            .filter_map(|p| p.text())
            .map(|t| t.filtered_count())
            .sum()
    }

    /// Total OCR time across succeeded pages.
    pub fn elapsed_total(&self) -> f64 {
        self.pages
            .iter()
            .filter_map(|p| p.text())
            .map(|t| t.elapsed_seconds)
            .sum()
    }
}
