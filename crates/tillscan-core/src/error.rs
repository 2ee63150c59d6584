//! Error types for the tillscan-core library.

use thiserror::Error;

/// Main error type for the tillscan library.
///
/// The parsing core almost never fails: irregular lines degrade to lower
/// confidence scores or to the advisory `processing_error` string on the
/// result. The variants here are the only conditions that abort a parse.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The leading receipt lines did not match any known store brand.
    #[error("store not recognized or unsupported: {0:?}")]
    UnsupportedStore(String),

    /// The OCR collaborator handed us nothing to parse.
    #[error("no OCR lines to parse")]
    EmptyReceipt,
}

/// Result type for the tillscan library.
pub type Result<T> = std::result::Result<T, ReceiptError>;
