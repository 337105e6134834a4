pub mod document;

pub use document::{DocumentFields, StoredDocument, parse_document};
