//! Store-specific receipt text parsing.

pub mod costco;
pub mod dispatch;
pub mod partial;
pub mod rules;
pub mod target;

pub use costco::CostcoReceiptParser;
pub use dispatch::{identify_store, parse_receipt};
pub use partial::PartialItem;
pub use target::TargetReceiptParser;

use crate::models::{ParsedReceipt, WordAnnotation};

/// One receipt-layout state machine.
///
/// Parsers are pure transformations over the line array: no I/O, no shared
/// state between invocations, never failing. Irregular input degrades to
/// confidence penalties or the advisory `processing_error` string.
pub trait ReceiptParser {
    /// Parse OCR lines (and optional word annotations) into a receipt.
    fn parse(&self, lines: &[String], annotations: &[WordAnnotation]) -> ParsedReceipt;
}
