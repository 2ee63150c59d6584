//! Target receipt parser.
//!
//! Target prints a fixed header (store name, two address lines, store
//! number, date) followed by item triples: a name line, a `$`-price line,
//! and an optional `"<qty> @ $<unit>"` line. Scanning stops at the first
//! tax line.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::bounds::resolve_bounds;
use crate::models::{Item, ParsedReceipt, Store, WordAnnotation};

use super::rules::confidence::{one_cent, round2, BASE_CONFIDENCE};
use super::rules::patterns::{
    BARE_DOLLAR_LINE, DATE_MDY, DOLLAR_PRICE, GIFT_CARD, ITEMS_IN_TRANSACTION, NUMERIC_LINE,
    STORE_NUMBER, TAX_MARKER,
};
use super::rules::{extract_price, extract_quantity, parse_amount, should_skip_line};
use super::ReceiptParser;

// Fixed header offsets for this layout.
const ADDRESS_START: usize = 1;
const ADDRESS_END: usize = 3; // exclusive
const STORE_NUMBER_LINE: usize = 3;
const DATE_LINE: usize = 4;
const ITEMS_START: usize = 5;

/// Parser for the price-follows-name layout.
pub struct TargetReceiptParser;

impl ReceiptParser for TargetReceiptParser {
    fn parse(&self, lines: &[String], annotations: &[WordAnnotation]) -> ParsedReceipt {
        debug!(line_count = lines.len(), "parsing Target receipt");

        let (items, tax_amount) = scan_items(lines, annotations);
        let items = merge_duplicates(items);

        let quantity_sum: u32 = items.iter().map(|i| i.unit_quantity).sum();

        let mut receipt = ParsedReceipt {
            store_name: Store::Target.name().to_string(),
            store_address: extract_address(lines),
            store_number: extract_store_number(lines),
            date_purchased: extract_date(lines),
            tax_amount,
            total_amount: extract_total(lines),
            items,
            // This layout reconciles against summed unit quantities, not
            // distinct items.
            total_items_count: quantity_sum,
            processing_error: None,
        };

        if let Some(stated) = extract_stated_count(lines) {
            if stated != quantity_sum {
                warn!(stated, parsed = quantity_sum, "item count mismatch");
                receipt.push_processing_error(format!(
                    "Expected {} items in transaction but parsed {}",
                    stated, quantity_sum
                ));
            }
        }

        receipt
    }
}

/// Whether a line cannot be an item name.
fn is_rejected_name(line: &str) -> bool {
    BARE_DOLLAR_LINE.is_match(line)
        || NUMERIC_LINE.is_match(line)
        || line.contains("***")
        || GIFT_CARD.is_match(line)
}

/// Walk the item region, producing raw (unmerged) items and the tax amount
/// from the terminating tax line.
fn scan_items(lines: &[String], annotations: &[WordAnnotation]) -> (Vec<Item>, Decimal) {
    let mut items = Vec::new();
    let mut tax_amount = Decimal::ZERO;

    let mut i = ITEMS_START.min(lines.len());
    while i < lines.len() {
        let line = lines[i].as_str();

        if TAX_MARKER.is_match(line) {
            if let Some(tax) = line_amount(line) {
                tax_amount = tax;
            }
            break;
        }

        if should_skip_line(line, None) || is_rejected_name(line) {
            i += 1;
            continue;
        }

        // Price must be on the very next line; anything else means this
        // was not an item name after all.
        let Some(price_match) = lines.get(i + 1).and_then(|l| DOLLAR_PRICE.captures(l)) else {
            i += 1;
            continue;
        };
        let Some(price) = parse_amount(&price_match[1]) else {
            i += 1;
            continue;
        };

        let name = line;
        let price_fragment = price_match.get(0).map(|m| m.as_str());

        let quantity = lines
            .get(i + 2)
            .and_then(|l| extract_quantity(l).map(|q| (l.as_str(), q)));

        let item = match quantity {
            Some((qty_line, (unit_quantity, unit_price))) => {
                // Reward price/quantity consistency, punish disagreement.
                let expected = unit_price * Decimal::from(unit_quantity);
                let confidence = if (expected - price).abs() > one_cent() {
                    round2(BASE_CONFIDENCE / 2.0)
                } else {
                    round2(BASE_CONFIDENCE.sqrt())
                };

                let fragments: Vec<&str> = [Some(name), price_fragment, Some(qty_line)]
                    .into_iter()
                    .flatten()
                    .collect();

                i += 3;
                build_item(name, price, unit_quantity, unit_price, confidence, &fragments, annotations)
            }
            None => {
                let fragments: Vec<&str> = [Some(name), price_fragment]
                    .into_iter()
                    .flatten()
                    .collect();

                i += 2;
                build_item(name, price, 1, price, BASE_CONFIDENCE, &fragments, annotations)
            }
        };

        debug!(name = %item.name, price = %item.price, "parsed item");
        items.push(item);
    }

    (items, tax_amount)
}

fn build_item(
    name: &str,
    price: Decimal,
    unit_quantity: u32,
    unit_price: Decimal,
    confidence: f32,
    fragments: &[&str],
    annotations: &[WordAnnotation],
) -> Item {
    let bounds = if annotations.is_empty() {
        None
    } else {
        Some(resolve_bounds(annotations, fragments))
    };

    Item {
        item_number: None,
        name: name.to_string(),
        price,
        unit_quantity,
        unit_price,
        tax_code: None,
        confidence,
        bounds,
    }
}

/// Merge items sharing identical `(name, price)`: quantities sum,
/// confidence keeps the minimum, first occurrence keeps its slot.
fn merge_duplicates(items: Vec<Item>) -> Vec<Item> {
    let mut merged: Vec<Item> = Vec::new();
    let mut index: HashMap<(String, Decimal), usize> = HashMap::new();

    for item in items {
        let key = (item.name.clone(), item.price);
        match index.get(&key) {
            Some(&slot) => {
                let existing = &mut merged[slot];
                existing.unit_quantity += item.unit_quantity;
                existing.confidence = existing.confidence.min(item.confidence);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

fn extract_address(lines: &[String]) -> Option<String> {
    let address: Vec<&str> = lines
        .get(ADDRESS_START..ADDRESS_END.min(lines.len()))?
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if address.is_empty() {
        None
    } else {
        Some(address.join(", "))
    }
}

fn extract_store_number(lines: &[String]) -> Option<String> {
    // Fixed offset first, then a header scan for misaligned receipts.
    if let Some(line) = lines.get(STORE_NUMBER_LINE) {
        if let Some(caps) = STORE_NUMBER.captures(line) {
            return Some(caps[1].to_string());
        }
    }

    lines
        .iter()
        .take(ITEMS_START)
        .find_map(|l| STORE_NUMBER.captures(l).map(|c| c[1].to_string()))
}

fn extract_date(lines: &[String]) -> Option<NaiveDate> {
    if let Some(date) = lines.get(DATE_LINE).and_then(|l| parse_date(l)) {
        return Some(date);
    }
    lines.iter().find_map(|l| parse_date(l))
}

pub(super) fn parse_date(line: &str) -> Option<NaiveDate> {
    let caps = DATE_MDY.captures(line)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let mut year: i32 = caps[3].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Last dollar-amount match, scanning from the end of the receipt.
fn extract_total(lines: &[String]) -> Decimal {
    for line in lines.iter().rev() {
        if let Some(caps) = DOLLAR_PRICE.captures_iter(line).last() {
            if let Some(total) = parse_amount(&caps[1]) {
                return total;
            }
        }
    }
    Decimal::ZERO
}

fn line_amount(line: &str) -> Option<Decimal> {
    DOLLAR_PRICE
        .captures(line)
        .and_then(|c| parse_amount(&c[1]))
        .or_else(|| extract_price(line))
}

fn extract_stated_count(lines: &[String]) -> Option<u32> {
    lines.iter().find_map(|line| {
        let caps = ITEMS_IN_TRANSACTION.captures(line)?;
        let count = caps.get(1).or_else(|| caps.get(2))?;
        count.as_str().parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn receipt_lines(body: &[&str]) -> Vec<String> {
        let mut lines = vec![
            "TARGET".to_string(),
            "1234 Main Street".to_string(),
            "Springfield, IL 62704".to_string(),
            "Store #1234".to_string(),
            "07/14/2025 10:23 AM".to_string(),
        ];
        lines.extend(body.iter().map(|s| s.to_string()));
        lines
    }

    fn parse(body: &[&str]) -> ParsedReceipt {
        TargetReceiptParser.parse(&receipt_lines(body), &[])
    }

    #[test]
    fn test_triple_line_item() {
        let receipt = parse(&[
            "Bananas",
            "$0.69",
            "3 @ $0.23",
            "TAX $0.05",
            "TOTAL $0.74",
            "3 items in transaction",
        ]);

        assert_eq!(receipt.items.len(), 1);
        let item = &receipt.items[0];
        assert_eq!(item.name, "Bananas");
        assert_eq!(item.price, dec("0.69"));
        assert_eq!(item.unit_quantity, 3);
        assert_eq!(item.unit_price, dec("0.23"));
        // 3 × 0.23 agrees with 0.69, so confidence is sqrt(0.95) ≈ 0.97.
        assert_eq!(item.confidence, 0.97);
        assert_eq!(receipt.processing_error, None);
    }

    #[test]
    fn test_quantity_price_mismatch_halves_confidence() {
        let receipt = parse(&[
            "Avocados",
            "$4.00",
            "3 @ $1.00",
            "TAX $0.00",
            "TOTAL $4.00",
        ]);

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].confidence, round2(BASE_CONFIDENCE / 2.0));
    }

    #[test]
    fn test_two_line_item_defaults() {
        let receipt = parse(&["Wondershop Wrap", "$5.00", "TAX $0.30", "TOTAL $5.30"]);

        assert_eq!(receipt.items.len(), 1);
        let item = &receipt.items[0];
        assert_eq!(item.unit_quantity, 1);
        assert_eq!(item.unit_price, dec("5.00"));
        assert_eq!(item.confidence, 0.95);
    }

    #[test]
    fn test_gift_card_never_becomes_item() {
        let receipt = parse(&[
            "GIFT CARD",
            "$25.00",
            "Bananas",
            "$0.69",
            "TAX $0.00",
            "TOTAL $25.69",
        ]);

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Bananas");
    }

    #[test]
    fn test_starred_and_bare_amount_lines_rejected() {
        let receipt = parse(&[
            "*** SAVINGS ***",
            "$3.00",
            "0123456789",
            "Bananas",
            "$0.69",
            "TAX $0.00",
            "TOTAL $0.69",
        ]);

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Bananas");
    }

    #[test]
    fn test_duplicate_merge() {
        let receipt = parse(&[
            "Sparkling Water",
            "$3.99",
            "2 @ $2.50",
            "Sparkling Water",
            "$3.99",
            "3 @ $1.33",
            "TAX $0.00",
            "TOTAL $7.98",
        ]);

        assert_eq!(receipt.items.len(), 1);
        let item = &receipt.items[0];
        assert_eq!(item.unit_quantity, 5);
        // First copy disagreed with its quantity line (2 × 2.50 ≠ 3.99),
        // so the halved confidence is the minimum and survives the merge.
        assert_eq!(item.confidence, round2(BASE_CONFIDENCE / 2.0));
    }

    #[test]
    fn test_count_mismatch_is_advisory() {
        let receipt = parse(&[
            "Bananas",
            "$0.69",
            "Milk",
            "$3.99",
            "TAX $0.00",
            "TOTAL $4.68",
            "5 items in transaction",
        ]);

        // Both items still come back; the mismatch only annotates.
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.total_items_count, 2);
        let error = receipt.processing_error.unwrap();
        assert!(error.contains("Expected 5"), "unexpected message: {error}");
    }

    #[test]
    fn test_header_metadata() {
        let receipt = parse(&["Bananas", "$0.69", "TAX $0.05", "TOTAL $0.74"]);

        assert_eq!(receipt.store_name, "Target");
        assert_eq!(
            receipt.store_address.as_deref(),
            Some("1234 Main Street, Springfield, IL 62704")
        );
        assert_eq!(receipt.store_number.as_deref(), Some("1234"));
        assert_eq!(
            receipt.date_purchased,
            NaiveDate::from_ymd_opt(2025, 7, 14)
        );
        assert_eq!(receipt.tax_amount, dec("0.05"));
        assert_eq!(receipt.total_amount, dec("0.74"));
    }

    #[test]
    fn test_scan_stops_at_tax_line() {
        let receipt = parse(&[
            "Bananas",
            "$0.69",
            "TAX $0.05",
            "Not An Item",
            "$9.99",
            "TOTAL $0.74",
        ]);

        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Bananas");
    }

    #[test]
    fn test_bounds_attached_from_annotations() {
        use crate::models::Vertex;

        let quad = |x1: i32, y1: i32, x2: i32, y2: i32| {
            [
                Vertex { x: x1, y: y1 },
                Vertex { x: x2, y: y1 },
                Vertex { x: x2, y: y2 },
                Vertex { x: x1, y: y2 },
            ]
        };
        let annotations = vec![
            WordAnnotation { text: "blob".to_string(), vertices: quad(0, 0, 500, 900) },
            WordAnnotation { text: "Bananas".to_string(), vertices: quad(20, 100, 120, 130) },
            WordAnnotation { text: "$0.69".to_string(), vertices: quad(400, 100, 460, 130) },
        ];

        let lines = receipt_lines(&["Bananas", "$0.69", "TAX $0.00", "TOTAL $0.69"]);
        let receipt = TargetReceiptParser.parse(&lines, &annotations);

        let bounds = receipt.items[0].bounds.unwrap();
        assert!(!bounds.is_sentinel());
        assert_eq!(bounds.min_x, 15);
        assert_eq!(bounds.max_x, 465);
    }
}
