//! OCR through an external command.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use super::{OcrEngine, OcrError, OcrOutput};

/// Placeholder replaced by the image path in command arguments.
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Runs an external program per page and reads the text from its stdout.
///
/// Arguments containing `{image}` have it replaced by the image path; if no
/// argument contains the placeholder, the path is appended as last argument.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    /// Create an engine for a program with arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create an engine from a whitespace-separated command line.
    ///
    /// Returns `None` for an empty command line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    /// Arguments for one image.
    fn args_for(&self, image: &Path) -> Vec<OsString> {
        let image_str = image.to_string_lossy();
        let mut args: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| OsString::from(arg.replace(IMAGE_PLACEHOLDER, &image_str)))
            .collect();

        if !self.args.iter().any(|arg| arg.contains(IMAGE_PLACEHOLDER)) {
            args.push(image.as_os_str().to_os_string());
        }

        args
    }
}

impl OcrEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn recognize(&self, image: &Path) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(self.args_for(image))
            .output()
            .map_err(|e| OcrError(format!("failed to run {}: {}", self.program, e)))?;

        let elapsed = start.elapsed().as_secs_f64();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(OcrOutput::new(text, elapsed))
    }
}
