//! Document aggregation: manifest pages, OCR and cleaning merged into one
//! ordered [`DocumentResult`].
//!
//! Each page is handled independently: the image is located, the engine is
//! asked for its text, and the text is cleaned. A failing page never aborts
//! the others. In parallel mode every page writes into its own pre-sized
//! slot, so the final order is the manifest order regardless of which
//! worker finishes first.

mod options;

pub use options::{AggregateOptions, MissingImagePolicy};

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::locate_image;
use crate::engine::OcrEngine;
use crate::error::Result;
use crate::filter::TextCleaner;
use crate::model::{DocumentResult, Manifest, PageDescriptor, PageResult, PageText};

/// Error text stored on pages recorded under [`MissingImagePolicy::RecordFailure`].
pub const IMAGE_NOT_FOUND: &str = "image not found";

/// Merges manifest pages with OCR output and cleaning statistics.
#[derive(Debug, Clone, Default)]
pub struct DocumentAggregator {
    options: AggregateOptions,
    cleaner: TextCleaner,
}

impl DocumentAggregator {
    /// Create a new aggregator.
    pub fn new(options: AggregateOptions) -> Self {
        let cleaner = TextCleaner::new(options.clean.clone());
        Self { options, cleaner }
    }

    /// Get the aggregation options.
    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Run OCR over every page of a manifest and assemble the result.
    pub fn aggregate<E>(
        &self,
        manifest: Manifest,
        images_dir: &Path,
        engine: &E,
    ) -> Result<DocumentResult>
    where
        E: OcrEngine + ?Sized,
    {
        self.aggregate_with_progress(manifest, images_dir, engine, |_| {})
    }

    /// Same as [`aggregate`](Self::aggregate), calling `progress` once per
    /// finished page (from worker threads in parallel mode). Omitted pages
    /// are not reported.
    pub fn aggregate_with_progress<E, F>(
        &self,
        manifest: Manifest,
        images_dir: &Path,
        engine: &E,
        progress: F,
    ) -> Result<DocumentResult>
    where
        E: OcrEngine + ?Sized,
        F: Fn(&PageResult) + Sync,
    {
        let total = manifest.pages.len();
        log::info!(
            "Aggregating {} pages with engine {} ({})",
            total,
            engine.name(),
            if self.options.parallel { "parallel" } else { "sequential" }
        );

        let run_page = |descriptor: &PageDescriptor| {
            let result = self.build_page(descriptor, images_dir, engine);
            if let Some(ref page) = result {
                progress(page);
            }
            result
        };

        let mut slots: Vec<Option<PageResult>> = (0..total).map(|_| None).collect();

        if self.options.parallel {
            let fill = |slots: &mut Vec<Option<PageResult>>| {
                slots
                    .par_iter_mut()
                    .zip(manifest.pages.par_iter())
                    .for_each(|(slot, descriptor)| *slot = run_page(descriptor));
            };

            if self.options.threads > 0 {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.options.threads)
                    .build()?;
                pool.install(|| fill(&mut slots));
            } else {
                fill(&mut slots);
            }
        } else {
            for (index, (slot, descriptor)) in slots.iter_mut().zip(&manifest.pages).enumerate() {
                log::info!(
                    "Processing page {}/{} ({})",
                    index + 1,
                    total,
                    descriptor.file_id
                );
                *slot = run_page(descriptor);
            }
        }

        Ok(assemble(manifest, slots))
    }

    /// Process a single page.
    ///
    /// Returns `None` when the image is missing and the policy omits such
    /// pages.
    pub fn build_page<E>(
        &self,
        descriptor: &PageDescriptor,
        images_dir: &Path,
        engine: &E,
    ) -> Option<PageResult>
    where
        E: OcrEngine + ?Sized,
    {
        let Some(image) = locate_image(images_dir, &descriptor.file_id, &self.options.extensions)
        else {
            log::warn!(
                "No image found for page {} ({}) in {}",
                descriptor.order,
                descriptor.file_id,
                images_dir.display()
            );
            return match self.options.missing_image {
                MissingImagePolicy::Omit => None,
                MissingImagePolicy::RecordFailure => {
                    Some(PageResult::failed(descriptor, None, IMAGE_NOT_FOUND))
                }
            };
        };

        let image_file = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match engine.recognize(&image) {
            Ok(output) => {
                let cleaned = self.cleaner.clean_with_stats(&output.text);
                log::debug!(
                    "Page {}: {} -> {} characters in {:.2}s",
                    descriptor.order,
                    cleaned.original_characters,
                    cleaned.cleaned_characters,
                    output.elapsed_seconds
                );

                let text = PageText {
                    raw_text: output.text,
                    cleaned_text: cleaned.text,
                    original_characters: cleaned.original_characters,
                    cleaned_characters: cleaned.cleaned_characters,
                    elapsed_seconds: output.elapsed_seconds,
                };
                Some(PageResult::succeeded(descriptor, image_file, text))
            }
            Err(err) => {
                log::warn!("OCR failed for page {} ({}): {}", descriptor.order, image_file, err);
                Some(PageResult::failed(descriptor, Some(image_file), err.to_string()))
            }
        }
    }
}

/// Join per-page slots into the final document result.
///
/// Empty slots (omitted pages) are dropped. Pages are kept in ascending
/// order; duplicate order values are kept and logged.
pub fn assemble(manifest: Manifest, slots: Vec<Option<PageResult>>) -> DocumentResult {
    let mut pages: Vec<PageResult> = slots.into_iter().flatten().collect();
    pages.sort_by_key(|p| p.order);

    let mut seen = HashSet::new();
    for page in &pages {
        if !seen.insert(page.order) {
            log::warn!("Duplicate page order {} ({})", page.order, page.physical_id);
        }
    }

    DocumentResult::new(
        manifest.metadata,
        manifest.logical_sections,
        manifest.logical_to_physical,
        pages,
    )
}
