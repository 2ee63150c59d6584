//! The mutable item accumulator used during a line scan.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::Item;

use super::rules::calculate_confidence;

/// Build-up state for one item while scanning its lines.
///
/// Fields fill in whatever order the receipt layout delivers them; a
/// partial becomes an [`Item`] through [`finalize`](Self::finalize) once
/// complete, or is dropped at end of scan if it never completes.
#[derive(Debug, Clone, Default)]
pub struct PartialItem {
    pub item_number: Option<u64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub unit_quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
    pub tax_code: Option<String>,

    /// Raw text fragments consumed for this item, kept for bounding-box
    /// resolution in formats that support preview crops.
    pub fragments: Vec<String>,
}

impl PartialItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a partial from an item-number header.
    pub fn with_number(number: u64) -> Self {
        Self {
            item_number: Some(number),
            ..Self::default()
        }
    }

    /// Completion predicate: item number, name, and price all present.
    pub fn is_complete(&self) -> bool {
        self.item_number.is_some() && self.name.is_some() && self.price.is_some()
    }

    /// Convert a complete partial into a finalized [`Item`], applying the
    /// defaulting rules: `unit_quantity` falls back to 1, `unit_price`
    /// falls back to the line price. Returns `None` when incomplete.
    pub fn finalize(self) -> Option<Item> {
        if !self.is_complete() {
            debug!(number = ?self.item_number, name = ?self.name, "discarding incomplete item");
            return None;
        }

        let name = self.name.unwrap_or_default();
        let price = self.price.unwrap_or_default();
        let unit_quantity = self.unit_quantity.unwrap_or(1).max(1);
        let unit_price = self.unit_price.unwrap_or(price);
        let confidence = calculate_confidence(price, &name, unit_price, unit_quantity);

        Some(Item {
            item_number: self.item_number,
            name,
            price,
            unit_quantity,
            unit_price,
            tax_code: self.tax_code,
            confidence,
            bounds: None,
        })
    }
}
