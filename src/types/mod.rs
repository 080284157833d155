pub mod identifiers;

pub use identifiers::{normalize, DocumentId, Revision};
