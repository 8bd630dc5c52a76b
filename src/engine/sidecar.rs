//! OCR from precomputed transcripts.

use std::path::{Path, PathBuf};

use super::{OcrEngine, OcrError, OcrOutput};

/// Transcript extensions tried in order (model markdown output first).
const TRANSCRIPT_EXTENSIONS: &[&str] = &["mmd", "md", "txt"];

/// Reads saved OCR output instead of running a model.
///
/// For an image `IMG.1.jpg` the engine looks for `IMG.1.mmd`, `IMG.1.md`
/// and `IMG.1.txt` in its transcript directory. Elapsed time is reported
/// as zero.
#[derive(Debug, Clone)]
pub struct SidecarEngine {
    dir: PathBuf,
}

impl SidecarEngine {
    /// Create an engine reading transcripts from a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the transcript directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn transcript_for(&self, image: &Path) -> Option<PathBuf> {
        let stem = image.file_stem()?.to_str()?;
        TRANSCRIPT_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
            .find(|candidate| candidate.is_file())
    }
}

impl OcrEngine for SidecarEngine {
    fn name(&self) -> &str {
        "sidecar"
    }

    fn recognize(&self, image: &Path) -> Result<OcrOutput, OcrError> {
        let transcript = self.transcript_for(image).ok_or_else(|| {
            OcrError(format!(
                "no transcript for {} in {}",
                image.display(),
                self.dir.display()
            ))
        })?;

        let text = std::fs::read_to_string(&transcript)?;
        Ok(OcrOutput::new(text, 0.0))
    }
}
