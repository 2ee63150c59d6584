//! Heuristic confidence scoring for parsed items.

use rust_decimal::Decimal;

/// Maximum confidence assigned to any parsed item.
pub const BASE_CONFIDENCE: f32 = 0.95;

/// One cent, the tolerance for price/quantity agreement checks.
pub fn one_cent() -> Decimal {
    Decimal::new(1, 2)
}

/// Round a confidence score to 2 decimals. Idempotent.
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Score how well an item's fields agree with expected invariants.
///
/// Starts at 0.95 and compounds penalty multipliers: ×0.7 for an absent or
/// implausibly large price, ×0.8 for a name length outside [3, 50], ×0.7
/// when `unit_price × unit_quantity` disagrees with `price` by more than
/// one cent. The result never exceeds the base and stays in [0, 1].
pub fn calculate_confidence(
    price: Decimal,
    name: &str,
    unit_price: Decimal,
    unit_quantity: u32,
) -> f32 {
    let mut confidence = BASE_CONFIDENCE;

    if price.is_zero() || price > Decimal::from(100) {
        confidence *= 0.7;
    }

    let name_len = name.chars().count();
    if !(3..=50).contains(&name_len) {
        confidence *= 0.8;
    }

    let expected = unit_price * Decimal::from(unit_quantity);
    if (expected - price).abs() > one_cent() {
        confidence *= 0.7;
    }

    round2(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_clean_item_scores_base() {
        assert_eq!(calculate_confidence(dec("3.99"), "Whole Milk Gal", dec("3.99"), 1), 0.95);
    }

    #[test]
    fn test_penalties_compound() {
        // Zero price and a too-short name: 0.95 * 0.7 * 0.8 * 0.7 (the
        // zero price also fails the unit-price agreement check).
        let score = calculate_confidence(Decimal::ZERO, "XX", dec("1.00"), 1);
        assert_eq!(score, round2(0.95 * 0.7 * 0.8 * 0.7));
    }

    #[test]
    fn test_implausible_price_penalty() {
        let score = calculate_confidence(dec("450.00"), "Big Ticket Item", dec("450.00"), 1);
        assert_eq!(score, round2(0.95 * 0.7));
    }

    #[test]
    fn test_unit_price_disagreement_penalty() {
        // 3 × 0.25 = 0.75, receipt says 0.69: off by more than a cent.
        let score = calculate_confidence(dec("0.69"), "Bananas", dec("0.25"), 3);
        assert_eq!(score, round2(0.95 * 0.7));

        // 3 × 0.23 = 0.69: within a cent, no penalty.
        let score = calculate_confidence(dec("0.69"), "Bananas", dec("0.23"), 3);
        assert_eq!(score, 0.95);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        for score in [0.95f32, 0.48, 0.67, 0.0, 1.0] {
            assert_eq!(round2(score), score);
            assert_eq!(round2(round2(score)), round2(score));
        }
    }

    #[test]
    fn test_bounds() {
        let worst = calculate_confidence(Decimal::ZERO, "", dec("5.00"), 2);
        assert!(worst >= 0.0);
        assert!(worst <= BASE_CONFIDENCE);
    }
}
