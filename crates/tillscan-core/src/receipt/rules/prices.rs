//! Price and quantity extraction from receipt lines.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::receipt::partial::PartialItem;

use super::patterns::{
    COUPON_LINE, EACH_PRICE, ORIG_PRICE, QUANTITY_AT, SAVINGS_LINE, SEPARATOR_LINE,
    SUBTOTAL_LINE, TRAILING_PRICE,
};

/// Parse a plain two-decimal amount string.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim().trim_start_matches('$')).ok()
}

/// Extract a price from a line, trying patterns in priority order.
///
/// A line like "2.99 Ea." matches both the "Ea." pattern and the bare
/// trailing-decimal pattern; trying them in a fixed order keeps the result
/// deterministic.
pub fn extract_price(line: &str) -> Option<Decimal> {
    for pattern in [&*ORIG_PRICE, &*EACH_PRICE, &*TRAILING_PRICE] {
        if let Some(caps) = pattern.captures(line) {
            if let Some(price) = parse_amount(&caps[1]) {
                return Some(price);
            }
        }
    }
    None
}

/// Extract a "<qty> @ <unit price>" pair from a line.
pub fn extract_quantity(line: &str) -> Option<(u32, Decimal)> {
    let caps = QUANTITY_AT.captures(line)?;
    let quantity: u32 = caps[1].parse().ok()?;
    let unit_price = parse_amount(&caps[2])?;
    Some((quantity, unit_price))
}

/// Whether a line is known non-item noise (coupons, subtotal banners,
/// savings banners, separator rows).
///
/// Exception: while an item is mid-construction (named but priceless), a
/// line carrying an extractable price is never skipped, even if it also
/// matches a noise pattern. A half-built item must not silently lose its
/// price line.
pub fn should_skip_line(line: &str, current: Option<&PartialItem>) -> bool {
    if let Some(item) = current {
        if item.name.is_some() && item.price.is_none() && extract_price(line).is_some() {
            return false;
        }
    }

    [&*COUPON_LINE, &*SUBTOTAL_LINE, &*SAVINGS_LINE, &*SEPARATOR_LINE]
        .iter()
        .any(|p| p.is_match(line))
}
