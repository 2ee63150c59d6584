//! Costco receipt parser.
//!
//! Warehouse receipts lead every item with an item/SKU number, but OCR
//! hands the pieces back in three arrangements: number inline with name
//! and price, number alone with the content on the next line, or price and
//! quantity lines trailing the header out of order. The scan keeps one
//! mutable [`PartialItem`] and classifies each line against it in priority
//! order instead of assuming a fixed per-item offset.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{Item, ParsedReceipt, Store, WordAnnotation};

use super::partial::PartialItem;
use super::rules::patterns::{
    BARE_PRICE_LINE, EACH_MARKER, EMBEDDED_ITEM, ITEMS_SOLD, ITEM_NUMBER_PREFIX, MEMBER_NUMBER,
    NUMERIC_LINE, SAVINGS_LINE, SUBTOTAL_LINE, TAX_MARKER, TOTAL_MARKER, TRAILING_HASH_NUMBER,
};
use super::rules::{extract_price, extract_quantity, parse_amount, should_skip_line};
use super::target::parse_date;
use super::ReceiptParser;

/// Parser for the item-number-led layout.
pub struct CostcoReceiptParser;

impl ReceiptParser for CostcoReceiptParser {
    // This layout carries no per-item crop support, so the annotations are
    // never consulted.
    fn parse(&self, lines: &[String], _annotations: &[WordAnnotation]) -> ParsedReceipt {
        debug!(line_count = lines.len(), "parsing Costco receipt");

        let raw_items = scan_items(lines);
        let (items, mut errors) = dedup_by_number(raw_items);

        let unique_count = items.len() as u32;

        if let Some(stated) = extract_stated_count(lines) {
            if stated != unique_count {
                warn!(stated, parsed = unique_count, "item count mismatch");
                errors.push(format!(
                    "Expected {} items sold but parsed {}",
                    stated, unique_count
                ));
            }
        }

        ParsedReceipt {
            store_name: Store::Costco.name().to_string(),
            store_address: extract_address(lines),
            store_number: extract_store_number(lines),
            date_purchased: lines.iter().find_map(|l| parse_date(l)),
            tax_amount: extract_tax(lines),
            total_amount: extract_total(lines),
            items,
            // This layout reconciles against the distinct item count, not
            // summed quantities.
            total_items_count: unique_count,
            processing_error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }
}

/// The tolerant per-line state machine.
fn scan_items(lines: &[String]) -> Vec<Item> {
    let mut items = Vec::new();
    let mut current: Option<PartialItem> = None;

    let mut i = 1; // line 0 is the store name
    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(caps) = ITEM_NUMBER_PREFIX.captures(line) {
            // A leading number is not always an item header: quantity
            // lines ("2 @ 3.49 Ea.") and bare prices start with digits
            // too, and belong to the item being built.
            if EACH_MARKER.is_match(line) || BARE_PRICE_LINE.is_match(line) {
                if let Some(cur) = current.as_mut() {
                    attach_continuation(cur, line);
                }
                i += 1;
                continue;
            }

            if let Ok(number) = caps[1].parse::<u64>() {
                finalize_into(&mut items, current.take());

                let mut partial = PartialItem::with_number(number);

                if NUMERIC_LINE.is_match(line) {
                    // Bare item number: content is deferred to the next
                    // line, unless that line is noise or another number.
                    let consumed = match lines.get(i + 1) {
                        Some(next)
                            if !should_skip_line(next, Some(&partial))
                                && !NUMERIC_LINE.is_match(next.trim()) =>
                        {
                            parse_embedded(&mut partial, next.trim());
                            true
                        }
                        _ => false,
                    };
                    current = Some(partial);
                    i += if consumed { 2 } else { 1 };
                } else {
                    let remainder = line[caps.get(0).unwrap().end()..].trim();
                    parse_embedded(&mut partial, remainder);
                    current = Some(partial);
                    i += 1;
                }
                continue;
            }
        }

        // Anything else: a stray price line may complete the current
        // item; otherwise the line is inert.
        if let Some(cur) = current.as_mut() {
            if cur.name.is_some() && cur.price.is_none() {
                if let Some(price) = extract_price(line) {
                    cur.price = Some(price);
                    cur.fragments.push(line.to_string());
                    i += 1;
                    continue;
                }
            }
        }

        i += 1;
    }

    finalize_into(&mut items, current.take());
    items
}

/// Apply a quantity/price continuation line to the item being built.
fn attach_continuation(current: &mut PartialItem, line: &str) {
    if let Some((quantity, unit_price)) = extract_quantity(line) {
        current.unit_quantity = Some(quantity);
        current.unit_price = Some(unit_price);
    } else if let Some(price) = extract_price(line) {
        if current.price.is_none() {
            current.price = Some(price);
        } else if current.unit_price.is_none() {
            current.unit_price = Some(price);
        }
    }
    current.fragments.push(line.to_string());
}

/// Parse item content embedded after (or deferred below) the item number:
/// `"<name> [<tax code>] <price>"`, or the whole text as a name when the
/// price is still to come.
fn parse_embedded(partial: &mut PartialItem, content: &str) {
    if content.is_empty() {
        return;
    }

    if let Some(caps) = EMBEDDED_ITEM.captures(content) {
        partial.name = Some(caps["name"].to_string());
        partial.tax_code = caps.name("code").map(|m| m.as_str().to_string());
        partial.price = parse_amount(&caps["price"]);
    } else {
        partial.name = Some(content.to_string());
    }
    partial.fragments.push(content.to_string());
}

fn finalize_into(items: &mut Vec<Item>, partial: Option<PartialItem>) {
    if let Some(item) = partial.and_then(PartialItem::finalize) {
        debug!(number = ?item.item_number, name = %item.name, "parsed item");
        items.push(item);
    }
}

/// Sort by item number and drop later duplicates, keeping the first seen
/// and recording an advisory warning for each drop.
fn dedup_by_number(mut items: Vec<Item>) -> (Vec<Item>, Vec<String>) {
    items.sort_by_key(|item| item.item_number);

    let mut seen: HashSet<u64> = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for item in items {
        let number = item.item_number.unwrap_or_default();
        if seen.insert(number) {
            unique.push(item);
        } else {
            errors.push(format!("Duplicate item number {}", number));
        }
    }

    (unique, errors)
}

fn extract_address(lines: &[String]) -> Option<String> {
    // Header runs from line 1 to the first item-number or member line.
    let header: Vec<&str> = lines
        .iter()
        .skip(1)
        .take(3)
        .map(|l| l.trim())
        .take_while(|l| !ITEM_NUMBER_PREFIX.is_match(l) && !MEMBER_NUMBER.is_match(l))
        .filter(|l| !l.is_empty())
        .collect();

    if header.is_empty() {
        None
    } else {
        Some(header.join(", "))
    }
}

fn extract_store_number(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .take(4)
        .find_map(|l| TRAILING_HASH_NUMBER.captures(l).map(|c| c[1].to_string()))
}

fn extract_tax(lines: &[String]) -> Decimal {
    lines
        .iter()
        .find(|l| TAX_MARKER.is_match(l))
        .and_then(|l| extract_price(l))
        .unwrap_or_default()
}

fn extract_total(lines: &[String]) -> Decimal {
    lines
        .iter()
        .find(|l| {
            TOTAL_MARKER.is_match(l)
                && !SUBTOTAL_LINE.is_match(l)
                && !SAVINGS_LINE.is_match(l)
                && !ITEMS_SOLD.is_match(l)
        })
        .and_then(|l| extract_price(l))
        .unwrap_or_default()
}

fn extract_stated_count(lines: &[String]) -> Option<u32> {
    lines
        .iter()
        .find_map(|l| ITEMS_SOLD.captures(l).and_then(|c| c[1].parse().ok()))
}
