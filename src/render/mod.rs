//! Rendering of document results to the exported JSON record and plain text.

mod json;
pub mod naming;
mod record;
mod text;

pub use json::{to_json, JsonFormat};
pub use record::{DocumentRecord, PageRecord};
pub use text::{to_text, EMPTY_PAGE_MARKER};
