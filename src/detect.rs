//! Page image lookup.
//!
//! Manifests reference page images by file id only (e.g. `IMG.1`), while the
//! scans on disk carry an image extension and sometimes have the dots of the
//! id replaced by underscores (`IMG_1.jpg`).

use std::path::{Path, PathBuf};

/// Extensions tried, in order, when locating a page image.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".tif", ".tiff"];

/// Locate the image for a file id inside a directory.
///
/// For each extension the plain file id is tried first, then the id with
/// dots replaced by underscores. The first existing file wins.
///
/// # Example
/// ```no_run
/// use metsocr::detect::{locate_image, DEFAULT_IMAGE_EXTENSIONS};
///
/// if let Some(path) = locate_image("o_szd.151/images", "IMG.1", DEFAULT_IMAGE_EXTENSIONS) {
///     println!("found {}", path.display());
/// }
/// ```
pub fn locate_image<P, S>(images_dir: P, file_id: &str, extensions: &[S]) -> Option<PathBuf>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let images_dir = images_dir.as_ref();
    let underscored = file_id.replace('.', "_");

    for ext in extensions {
        let ext = ext.as_ref();

        let candidate = images_dir.join(format!("{}{}", file_id, ext));
        if candidate.is_file() {
            return Some(candidate);
        }

        let candidate = images_dir.join(format!("{}{}", underscored, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

/// Check if a path has one of the given image extensions (case-insensitive).
pub fn has_image_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    extensions
        .iter()
        .any(|ext| name.ends_with(&ext.as_ref().to_lowercase()))
}
