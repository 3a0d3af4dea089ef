//! Data model for parsed documents.
//!
//! These types sit between the document parser and the text assembler:
//! raw parser output (`ParseResult`) is flattened into `Element`s, which are
//! assembled into one `DocumentText` per source `Document`.

mod document;
mod element;
mod parse_result;

pub use document::{Document, DocumentText};
pub use element::{BoundingBox, Element, ElementRow, PrimaryPagePolicy};
pub(crate) use parse_result::json_kind;
pub use parse_result::{ErrorEntry, ErrorStatus, ParseResult, ParsedDocument};
