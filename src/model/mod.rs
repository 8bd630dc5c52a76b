//! Document model types for OCR results.
//!
//! This module defines the types that flow between the manifest parser,
//! the aggregator and the renderers: page descriptors taken from the
//! manifest, per-page OCR outcomes, and the assembled document result.

mod document;
mod page;
mod structure;

pub use document::{DocumentMetadata, DocumentResult, Manifest};
pub use page::{PageDescriptor, PageOutcome, PageResult, PageText};
pub use structure::{LogicalLinks, LogicalSection};
