//! Plain-text export of document records.

use crate::filter::EMPTY_PAGE_SENTINEL;

use super::DocumentRecord;

/// Placeholder written for pages filtered as empty.
pub const EMPTY_PAGE_MARKER: &str = "[EMPTY PAGE]";

/// Convert a document record to plain text.
///
/// Every page with non-blank text becomes a `--- PAGE N ---` block. Pages
/// without text (failed pages) are skipped.
pub fn to_text(record: &DocumentRecord) -> String {
    let mut output = String::new();

    for page in &record.pages {
        let Some(text) = page.text.as_deref() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }

        let body = if text == EMPTY_PAGE_SENTINEL {
            EMPTY_PAGE_MARKER
        } else {
            text
        };

        output.push_str(&format!("--- PAGE {} ---\n\n", page.page));
        output.push_str(body);
        output.push_str("\n\n");
    }

    output
}
