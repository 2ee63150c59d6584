//! Store identification and parser routing.

use tracing::{debug, info};

use crate::error::{ReceiptError, Result};
use crate::models::{ParsedReceipt, ParserKind, Store, WordAnnotation};

use super::rules::damerau_levenshtein;
use super::{CostcoReceiptParser, ReceiptParser, TargetReceiptParser};

/// Known brand prefixes, longest variant first per brand.
const KNOWN_BRANDS: &[(&str, Store)] = &[
    ("COSTCO WHOLESALE", Store::Costco),
    ("COSTCO", Store::Costco),
    ("SUPER TARGET", Store::Target),
    ("TARGET", Store::Target),
];

/// Identify the store brand from the leading receipt line(s).
///
/// OCR sometimes splits a store name across two lines, so line 0 and the
/// concatenation of lines 0 and 1 are both tried, first by exact prefix
/// and then by edit distance against the same-length head of the line.
pub fn identify_store(lines: &[String]) -> Option<Store> {
    let first = normalize(lines.first()?);
    let joined = lines.get(1).map(|l| format!("{} {}", first, normalize(l)));

    for candidate in [Some(first), joined].into_iter().flatten() {
        for (prefix, store) in KNOWN_BRANDS {
            if candidate.starts_with(prefix) {
                return Some(*store);
            }
        }

        for (prefix, store) in KNOWN_BRANDS {
            let head: String = candidate.chars().take(prefix.chars().count()).collect();
            let distance = damerau_levenshtein(&head, prefix);
            if distance <= fuzz_budget(prefix) {
                debug!(brand = prefix, distance, "fuzzy brand match");
                return Some(*store);
            }
        }
    }

    None
}

fn normalize(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

// Tolerated OCR noise scales with how much of the brand name there is to
// misread; short names get a tight budget so "TARGET" does not swallow
// arbitrary six-letter words.
fn fuzz_budget(prefix: &str) -> usize {
    if prefix.len() >= 10 { 2 } else { 1 }
}

/// Parse a receipt end to end: identify the store, run the matching
/// layout parser, return the normalized record.
///
/// This is the only operation in the core that can fail: an unrecognized
/// store is a terminal, user-facing condition. Every downstream
/// irregularity is advisory (`processing_error`) instead.
pub fn parse_receipt(lines: &[String], annotations: &[WordAnnotation]) -> Result<ParsedReceipt> {
    let store = identify_store(lines).ok_or_else(|| match lines.first() {
        Some(first) => ReceiptError::UnsupportedStore(first.clone()),
        None => ReceiptError::EmptyReceipt,
    })?;

    info!(store = store.name(), lines = lines.len(), "dispatching receipt");

    let receipt = match store.parser_kind() {
        ParserKind::ItemNumberLed => CostcoReceiptParser.parse(lines, annotations),
        ParserKind::PriceFollowsName => TargetReceiptParser.parse(lines, annotations),
    };

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_brand_match() {
        assert_eq!(identify_store(&lines(&["COSTCO WHOLESALE"])), Some(Store::Costco));
        assert_eq!(identify_store(&lines(&["TARGET"])), Some(Store::Target));
        assert_eq!(identify_store(&lines(&["Target Store T-1234"])), Some(Store::Target));
    }

    #[test]
    fn test_split_store_name() {
        assert_eq!(
            identify_store(&lines(&["COSTCO", "WHOLESALE"])),
            Some(Store::Costco)
        );
    }

    #[test]
    fn test_fuzzy_brand_match() {
        // One OCR transposition.
        assert_eq!(identify_store(&lines(&["COSTCO WHOLESLAE"])), Some(Store::Costco));
        assert_eq!(identify_store(&lines(&["TARGE7"])), Some(Store::Target));
    }

    #[test]
    fn test_unknown_store() {
        assert_eq!(identify_store(&lines(&["KWIK-E-MART", "123 Main St"])), None);
        assert_eq!(identify_store(&[]), None);
    }

    #[test]
    fn test_unsupported_store_is_fatal() {
        let err = parse_receipt(&lines(&["KWIK-E-MART"]), &[]).unwrap_err();
        assert!(matches!(err, ReceiptError::UnsupportedStore(_)));

        let err = parse_receipt(&[], &[]).unwrap_err();
        assert!(matches!(err, ReceiptError::EmptyReceipt));
    }

    #[test]
    fn test_routing_to_costco() {
        let receipt = parse_receipt(
            &lines(&["COSTCO WHOLESALE", "7 Whole Milk Gal F 3.99"]),
            &[],
        )
        .unwrap();

        assert_eq!(receipt.store_name, "Costco");
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].item_number, Some(7));
    }

    #[test]
    fn test_routing_to_target() {
        let receipt = parse_receipt(
            &lines(&[
                "TARGET",
                "1234 Main Street",
                "Springfield, IL 62704",
                "Store #1234",
                "07/14/2025",
                "Bananas",
                "$0.69",
                "TAX $0.00",
                "TOTAL $0.69",
            ]),
            &[],
        )
        .unwrap();

        assert_eq!(receipt.store_name, "Target");
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Bananas");
    }
}
