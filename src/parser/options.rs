//! Parsing options and configuration.

/// Options for parsing METS manifests.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to accept DOCTYPE declarations
    pub allow_dtd: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid page nodes).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Accept or reject DOCTYPE declarations.
    pub fn with_dtd(mut self, allow: bool) -> Self {
        self.allow_dtd = allow;
        self
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on page nodes without a usable ID or ORDER
    #[default]
    Strict,
    /// Skip such page nodes and continue
    Lenient,
}
