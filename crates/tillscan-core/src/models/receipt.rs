//! Parsed receipt data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::annotation::BoundingBox;

/// A finalized purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Store item/SKU number, when the receipt format carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_number: Option<u64>,

    /// Product name as printed on the receipt.
    pub name: String,

    /// Line total for this item. Always populated (0 if never found).
    pub price: Decimal,

    /// Number of units purchased. Always at least 1.
    pub unit_quantity: u32,

    /// Per-unit price. Falls back to `price` when the receipt never
    /// states one.
    pub unit_price: Decimal,

    /// Store-specific tax/type code (e.g. "F" for food).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,

    /// Heuristic agreement score in [0, 1], rounded to 2 decimals.
    pub confidence: f32,

    /// Crop rectangle for a preview image, when the format supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

/// A fully parsed receipt, constructed once per upload and never mutated
/// after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Canonical store brand name.
    pub store_name: String,

    /// Street address from the receipt header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_address: Option<String>,

    /// Store/warehouse number from the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_number: Option<String>,

    /// Purchase date, when one could be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_purchased: Option<NaiveDate>,

    /// Tax charged.
    pub tax_amount: Decimal,

    /// Receipt total.
    pub total_amount: Decimal,

    /// Purchased items in output order.
    pub items: Vec<Item>,

    /// Per-format item count: summed unit quantities for the
    /// price-follows-name format, distinct item count for the
    /// item-number-led format. Compared against different stated-count
    /// fields on the source receipt, so the asymmetry is deliberate.
    pub total_items_count: u32,

    /// Advisory warnings ("parsed with caveats"); `None` means clean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_error: Option<String>,
}

impl ParsedReceipt {
    /// Append an advisory warning, concatenating with `"; "` when one is
    /// already present.
    pub fn push_processing_error(&mut self, message: impl AsRef<str>) {
        match &mut self.processing_error {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(message.as_ref());
            }
            None => self.processing_error = Some(message.as_ref().to_string()),
        }
    }
}

/// Store brands this parser family recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    Costco,
    Target,
}

impl Store {
    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            Store::Costco => "Costco",
            Store::Target => "Target",
        }
    }

    /// Which receipt layout this brand prints.
    pub fn parser_kind(&self) -> ParserKind {
        match self {
            Store::Costco => ParserKind::ItemNumberLed,
            Store::Target => ParserKind::PriceFollowsName,
        }
    }
}

/// Receipt layout families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    /// Every item opens with an item/SKU number; names and prices may
    /// arrive inline, on the next line, or out of order.
    ItemNumberLed,

    /// Name line, then price line, then optional quantity line, at fixed
    /// offsets after the header.
    PriceFollowsName,
}
