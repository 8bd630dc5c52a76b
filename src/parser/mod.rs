//! METS manifest parsing module.

mod mets_parser;
mod options;

pub use mets_parser::{MetsParser, METS_NS, MODS_NS, DV_NS, XLINK_NS};
pub use options::{ErrorMode, ParseOptions};
