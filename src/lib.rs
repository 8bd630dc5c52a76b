//! # metsocr
//!
//! OCR post-processing for digitized archival documents described by METS
//! manifests.
//!
//! The library reads a document's `mets.xml`, runs an OCR engine over the
//! page scans in its `images/` directory, strips scan artifacts (color
//! charts, gray scales, rulers, stray page markers) from the recognized text,
//! and assembles a page-ordered record with per-page statistics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use metsocr::{process_directory, AggregateOptions, CommandEngine, DocumentRecord, render};
//!
//! fn main() -> metsocr::Result<()> {
//!     let engine = CommandEngine::parse("tesseract {image} - -l deu").unwrap();
//!     let doc = process_directory("o_szd.151", &engine, AggregateOptions::default())?;
//!
//!     let record = DocumentRecord::from(&doc);
//!     println!("{}", render::to_json(&record, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Artifact filtering**: line classifier and empty-page detector for OCR noise
//! - **METS parsing**: page order, bibliographic metadata, logical structure
//! - **Parallel OCR**: pages processed on a bounded Rayon pool, order preserved
//! - **Export**: JSON document record and plain-text page export

pub mod aggregate;
pub mod detect;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use aggregate::{assemble, AggregateOptions, DocumentAggregator, MissingImagePolicy};
pub use detect::{locate_image, DEFAULT_IMAGE_EXTENSIONS};
pub use engine::{CommandEngine, OcrEngine, OcrError, OcrOutput, SidecarEngine};
pub use error::{Error, Result};
pub use filter::{
    classify_line, clean_text, is_artifact_line, is_empty_page, CleanOptions, CleanedText,
    FilterStats, LineVerdict, TextCleaner,
};
pub use model::{
    DocumentMetadata, DocumentResult, LogicalLinks, LogicalSection, Manifest, PageDescriptor,
    PageOutcome, PageResult, PageText,
};
pub use parser::{ErrorMode, MetsParser, ParseOptions};
pub use render::{DocumentRecord, JsonFormat, PageRecord};

use std::path::{Path, PathBuf};

/// File name of the manifest inside a document directory.
pub const MANIFEST_FILE: &str = "mets.xml";

/// Name of the page image directory inside a document directory.
pub const IMAGES_DIR: &str = "images";

/// Parse a METS manifest file.
///
/// # Example
///
/// ```no_run
/// use metsocr::parse_manifest_file;
///
/// let manifest = parse_manifest_file("o_szd.151/mets.xml").unwrap();
/// println!("Pages: {}", manifest.page_count());
/// ```
pub fn parse_manifest_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    MetsParser::open(path)?.parse()
}

/// Parse a METS manifest file with custom options.
pub fn parse_manifest_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<Manifest> {
    MetsParser::open_with_options(path, options)?.parse()
}

/// Parse METS manifest text.
pub fn parse_manifest_str(xml: &str) -> Result<Manifest> {
    MetsParser::from_xml(xml).parse()
}

/// Parse METS manifest bytes.
pub fn parse_manifest_bytes(data: &[u8]) -> Result<Manifest> {
    MetsParser::from_bytes(data)?.parse()
}

/// Process a document directory containing `mets.xml` and `images/`.
///
/// A missing manifest or image directory is fatal; nothing is produced.
pub fn process_directory<P, E>(
    dir: P,
    engine: &E,
    options: AggregateOptions,
) -> Result<DocumentResult>
where
    P: AsRef<Path>,
    E: OcrEngine + ?Sized,
{
    MetsOcr::new()
        .with_aggregate_options(options)
        .process_dir(dir, engine)
}

/// Locate the manifest and image directory of a document directory.
///
/// Returns `(mets.xml, images/)`.
pub fn document_paths<P: AsRef<Path>>(dir: P) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();

    let manifest = dir.join(MANIFEST_FILE);
    if !manifest.is_file() {
        return Err(Error::ManifestNotFound(manifest));
    }

    let images = dir.join(IMAGES_DIR);
    if !images.is_dir() {
        return Err(Error::ImagesDirNotFound(images));
    }

    Ok((manifest, images))
}

/// Builder for processing METS documents.
///
/// # Example
///
/// ```no_run
/// use metsocr::{MetsOcr, SidecarEngine};
///
/// let engine = SidecarEngine::new("transcripts");
/// let doc = MetsOcr::new()
///     .lenient()
///     .sequential()
///     .record_missing_images()
///     .process_dir("o_szd.151", &engine)?;
/// println!("{} of {} pages recognized", doc.successful_count(), doc.total_pages());
/// # Ok::<(), metsocr::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetsOcr {
    parse_options: ParseOptions,
    aggregate_options: AggregateOptions,
}

impl MetsOcr {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip malformed page nodes instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.aggregate_options = self.aggregate_options.sequential();
        self
    }

    /// Set the worker thread count (0 = Rayon default).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.aggregate_options = self.aggregate_options.with_threads(threads);
        self
    }

    /// Keep or collapse blank-line runs in cleaned text.
    pub fn preserve_structure(mut self, preserve: bool) -> Self {
        let clean = self.aggregate_options.clean.with_preserve_structure(preserve);
        self.aggregate_options.clean = clean;
        self
    }

    /// Normalize page text to NFC before cleaning.
    pub fn normalize_unicode(mut self) -> Self {
        let clean = self.aggregate_options.clean.with_unicode_normalization(true);
        self.aggregate_options.clean = clean;
        self
    }

    /// Record pages without an image as failed.
    pub fn record_missing_images(mut self) -> Self {
        self.aggregate_options = self.aggregate_options.record_missing_images();
        self
    }

    /// Replace the image extension list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aggregate_options = self.aggregate_options.with_extensions(extensions);
        self
    }

    /// Set the manifest parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the aggregation options.
    pub fn with_aggregate_options(mut self, options: AggregateOptions) -> Self {
        self.aggregate_options = options;
        self
    }

    /// Process a document directory.
    pub fn process_dir<P, E>(self, dir: P, engine: &E) -> Result<DocumentResult>
    where
        P: AsRef<Path>,
        E: OcrEngine + ?Sized,
    {
        self.process_dir_with_progress(dir, engine, |_| {})
    }

    /// Process a document directory, reporting every finished page.
    pub fn process_dir_with_progress<P, E, F>(
        self,
        dir: P,
        engine: &E,
        progress: F,
    ) -> Result<DocumentResult>
    where
        P: AsRef<Path>,
        E: OcrEngine + ?Sized,
        F: Fn(&PageResult) + Sync,
    {
        let (manifest_path, images_dir) = document_paths(dir)?;
        let manifest = parse_manifest_file_with_options(&manifest_path, self.parse_options)?;

        log::info!(
            "Loaded {} ({} pages)",
            manifest_path.display(),
            manifest.page_count()
        );

        DocumentAggregator::new(self.aggregate_options).aggregate_with_progress(
            manifest,
            &images_dir,
            engine,
            progress,
        )
    }
}
