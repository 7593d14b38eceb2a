pub mod document;

pub use document::{load_document, parse_document};
