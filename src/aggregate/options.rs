//! Aggregation options.

use crate::detect::DEFAULT_IMAGE_EXTENSIONS;
use crate::filter::CleanOptions;

/// What to do with a page whose image cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingImagePolicy {
    /// Leave the page out of the result
    #[default]
    Omit,
    /// Record the page as failed with an "image not found" error
    RecordFailure,
}

/// Options for document aggregation.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Text cleaner configuration
    pub clean: CleanOptions,

    /// Image extensions tried in order, including the leading dot
    pub extensions: Vec<String>,

    /// Handling of pages without an image
    pub missing_image: MissingImagePolicy,

    /// Process pages in parallel
    pub parallel: bool,

    /// Worker thread count (0 = rayon default)
    pub threads: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            clean: CleanOptions::default(),
            extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            missing_image: MissingImagePolicy::default(),
            parallel: true,
            threads: 0,
        }
    }
}

impl AggregateOptions {
    /// Create new aggregation options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text cleaner configuration.
    pub fn with_clean_options(mut self, clean: CleanOptions) -> Self {
        self.clean = clean;
        self
    }

    /// Replace the image extension list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the missing image policy.
    pub fn with_missing_image(mut self, policy: MissingImagePolicy) -> Self {
        self.missing_image = policy;
        self
    }

    /// Record pages without an image as failed instead of omitting them.
    pub fn record_missing_images(self) -> Self {
        self.with_missing_image(MissingImagePolicy::RecordFailure)
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AggregateOptions::default();
        assert!(options.parallel);
        assert_eq!(options.threads, 0);
        assert_eq!(options.missing_image, MissingImagePolicy::Omit);
        assert_eq!(options.extensions, vec![".jpg", ".jpeg", ".png", ".tif", ".tiff"]);
        assert!(options.clean.preserve_structure);
    }

    #[test]
    fn test_builder_chain() {
        let options = AggregateOptions::new()
            .sequential()
            .with_threads(4)
            .record_missing_images()
            .with_extensions([".png"]);

        assert!(!options.parallel);
        assert_eq!(options.threads, 4);
        assert_eq!(options.missing_image, MissingImagePolicy::RecordFailure);
        assert_eq!(options.extensions, vec![".png"]);
    }
}
