//! FineReader XML parsing module.

mod encoding;
mod options;
mod xml_parser;

pub use encoding::detect_encoding;
pub use options::{ErrorMode, ParseOptions};
pub use xml_parser::AbbyyParser;
