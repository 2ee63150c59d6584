//! Data models for receipt parsing.

pub mod annotation;
pub mod receipt;

pub use annotation::{BoundingBox, OcrDocument, Vertex, WordAnnotation};
pub use receipt::{Item, ParsedReceipt, ParserKind, Store};
