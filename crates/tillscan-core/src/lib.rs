//! Core library for grocery receipt OCR processing.
//!
//! This crate provides:
//! - Store-specific receipt text parsers (Costco, Target layouts)
//! - Shared line classification rules (prices, quantities, skip lines,
//!   edit-distance fuzzy matching, confidence scoring)
//! - Bounding-box resolution for per-item preview crops
//! - A dispatcher that identifies the store and normalizes results
//!
//! The parsing core is a pure, synchronous transformation over the
//! `(lines, annotations)` pair supplied by the OCR collaborator; image
//! handling, storage, and the review workflow live elsewhere.

pub mod bounds;
pub mod error;
pub mod models;
pub mod receipt;

pub use bounds::resolve_bounds;
pub use error::{ReceiptError, Result};
pub use models::{
    BoundingBox, Item, OcrDocument, ParsedReceipt, ParserKind, Store, Vertex, WordAnnotation,
};
pub use receipt::{
    identify_store, parse_receipt, CostcoReceiptParser, ReceiptParser, TargetReceiptParser,
};
