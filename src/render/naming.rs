//! Output file naming.

use std::path::{Path, PathBuf};

/// Name of the JSON record file for a document.
pub fn json_file_name(object_id: &str, cleaned: bool) -> String {
    if cleaned {
        format!("{}_ocr_cleaned.json", object_id)
    } else {
        format!("{}_ocr.json", object_id)
    }
}

/// Name of the plain-text export file for a document.
pub fn text_file_name(object_id: &str, cleaned: bool) -> String {
    if cleaned {
        format!("{}_fulltext_cleaned.txt", object_id)
    } else {
        format!("{}_fulltext.txt", object_id)
    }
}

/// Default output directory `results/mets_<object_id>_<timestamp>` under a base directory.
pub fn default_output_dir(base: &Path, object_id: &str, timestamp: &str) -> PathBuf {
    base.join("results")
        .join(format!("mets_{}_{}", object_id, timestamp))
}

/// Object id of a document directory (its final path component).
pub fn object_id(document_dir: &Path) -> String {
    document_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Paths of the cleaned variants next to an existing `<id>_ocr.json`.
///
/// Returns `(json, text)`.
pub fn cleaned_paths(record_path: &Path) -> (PathBuf, PathBuf) {
    let file_name = record_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = file_name.strip_suffix(".json").unwrap_or(&file_name);
    let json = format!("{}_cleaned.json", stem);
    let text = match stem.strip_suffix("_ocr") {
        Some(id) => text_file_name(id, true),
        None => format!("{}_fulltext_cleaned.txt", stem),
    };

    (record_path.with_file_name(json), record_path.with_file_name(text))
}
