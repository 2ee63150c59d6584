//! Shared line-classification rules for receipt parsing.

pub mod confidence;
pub mod distance;
pub mod patterns;
pub mod prices;

pub use confidence::{calculate_confidence, round2, BASE_CONFIDENCE};
pub use distance::damerau_levenshtein;
pub use prices::{extract_price, extract_quantity, parse_amount, should_skip_line};
