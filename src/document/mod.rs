pub mod document;
pub mod schema;
pub mod validators;

pub use crate::types::identifiers::{DocumentId, Revision};
pub use document::{Document, DocumentError, Saved};
pub use schema::{Properties, PropertyDef, Schema};
pub use validators::{
    AnyValidator, ArrayValidator, BooleanValidator, ChoiceValidator, IntegerValidator,
    StringValidator, Validator,
};
