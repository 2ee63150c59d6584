//! Common regex patterns for receipt line classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price patterns, in extraction priority order. A single line can
    // satisfy more than one of these (an "Ea." line also ends in a bare
    // decimal), so the order in `extract_price` is significant.
    pub static ref ORIG_PRICE: Regex = Regex::new(
        r"(?i)(\d+\.\d{2})\s*orig\b"
    ).unwrap();

    pub static ref EACH_PRICE: Regex = Regex::new(
        r"(?i)(\d+\.\d{2})\s*ea\b\.?"
    ).unwrap();

    pub static ref TRAILING_PRICE: Regex = Regex::new(
        r"(?i)\$?(\d+\.\d{2})(?:\s+(?:lb|oz|kg))?\s*$"
    ).unwrap();

    // Dollar-sign price anywhere in the line (Target price lines).
    pub static ref DOLLAR_PRICE: Regex = Regex::new(
        r"\$(\d+\.\d{2})"
    ).unwrap();

    // Quantity lines: "3 @ $0.23" / "2 @ 3.49 Ea."
    pub static ref QUANTITY_AT: Regex = Regex::new(
        r"^(\d+)\s*@\s*\$?(\d+\.\d{2})"
    ).unwrap();

    // Item-number shapes (Costco layout).
    pub static ref ITEM_NUMBER_PREFIX: Regex = Regex::new(
        r"^(\d+)(?:\s+|$)"
    ).unwrap();

    pub static ref NUMERIC_LINE: Regex = Regex::new(
        r"^\d+$"
    ).unwrap();

    pub static ref BARE_PRICE_LINE: Regex = Regex::new(
        r"^\d+\.\d{2}$"
    ).unwrap();

    pub static ref BARE_DOLLAR_LINE: Regex = Regex::new(
        r"^\$\d+\.\d{2}$"
    ).unwrap();

    pub static ref EACH_MARKER: Regex = Regex::new(
        r"(?i)\bea\b\.?"
    ).unwrap();

    // Inline item content: "<name> [<tax code>] <price>"
    pub static ref EMBEDDED_ITEM: Regex = Regex::new(
        r"^(?P<name>.+?)\s+(?:(?P<code>A|B|E|F|H|FF)\s+)?(?P<price>\d+\.\d{2})$"
    ).unwrap();

    // Non-item noise.
    pub static ref COUPON_LINE: Regex = Regex::new(
        r"(?i)\b(?:coupon|cpn)\b"
    ).unwrap();

    pub static ref SUBTOTAL_LINE: Regex = Regex::new(
        r"(?i)\bsub\s*total\b"
    ).unwrap();

    pub static ref SAVINGS_LINE: Regex = Regex::new(
        r"(?i)(?:you\s+saved|\bsavings\b)"
    ).unwrap();

    pub static ref SEPARATOR_LINE: Regex = Regex::new(
        r"^[\s\-=*_.]+$"
    ).unwrap();

    pub static ref GIFT_CARD: Regex = Regex::new(
        r"(?i)gift\s*card"
    ).unwrap();

    // Receipt-level markers.
    pub static ref TAX_MARKER: Regex = Regex::new(
        r"(?i)\btax\b"
    ).unwrap();

    pub static ref TOTAL_MARKER: Regex = Regex::new(
        r"(?i)\btotal\b"
    ).unwrap();

    // Stated item counts. Target prints "items in transaction" (count on
    // either side); Costco prints "TOTAL NUMBER OF ITEMS SOLD = N".
    pub static ref ITEMS_IN_TRANSACTION: Regex = Regex::new(
        r"(?i)(?:(\d+)\s+)?items?\s+in\s+transaction(?:\s*[:=]?\s*(\d+))?"
    ).unwrap();

    pub static ref ITEMS_SOLD: Regex = Regex::new(
        r"(?i)(?:total\s+)?(?:number\s+of\s+)?items\s+sold\s*[=:]?\s*(\d+)"
    ).unwrap();

    // Header metadata.
    pub static ref STORE_NUMBER: Regex = Regex::new(
        r"(?i)store\s*#?\s*(\d{1,6})"
    ).unwrap();

    pub static ref TRAILING_HASH_NUMBER: Regex = Regex::new(
        r"#\s*(\d{1,6})\s*$"
    ).unwrap();

    pub static ref MEMBER_NUMBER: Regex = Regex::new(
        r"(?i)^member(?:ship)?\s*#?\s*(\d+)"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_item_pattern() {
        let caps = EMBEDDED_ITEM.captures("Whole Milk Gal F 3.99").unwrap();
        assert_eq!(&caps["name"], "Whole Milk Gal");
        assert_eq!(&caps["code"], "F");
        assert_eq!(&caps["price"], "3.99");

        let caps = EMBEDDED_ITEM.captures("KS Bath Tissue 19.99").unwrap();
        assert_eq!(&caps["name"], "KS Bath Tissue");
        assert!(caps.name("code").is_none());
        assert_eq!(&caps["price"], "19.99");
    }

    #[test]
    fn test_item_number_prefix() {
        assert!(ITEM_NUMBER_PREFIX.is_match("1234567 KS Bath Tissue"));
        assert!(ITEM_NUMBER_PREFIX.is_match("1234567"));
        assert!(!ITEM_NUMBER_PREFIX.is_match("KS 1234567"));
        // A quantity line technically starts with digits too; callers
        // disambiguate with EACH_MARKER / BARE_PRICE_LINE first.
        assert!(ITEM_NUMBER_PREFIX.is_match("2 @ 3.49 Ea."));
    }

    #[test]
    fn test_quantity_at() {
        let caps = QUANTITY_AT.captures("3 @ $0.23").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "0.23");

        let caps = QUANTITY_AT.captures("2 @ 3.49 Ea.").unwrap();
        assert_eq!(&caps[1], "2");
        assert_eq!(&caps[2], "3.49");
    }

    #[test]
    fn test_stated_count_patterns() {
        let caps = ITEMS_IN_TRANSACTION.captures("12 items in transaction").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "12");

        let caps = ITEMS_IN_TRANSACTION.captures("ITEMS IN TRANSACTION: 7").unwrap();
        assert_eq!(caps.get(2).unwrap().as_str(), "7");

        let caps = ITEMS_SOLD.captures("TOTAL NUMBER OF ITEMS SOLD = 15").unwrap();
        assert_eq!(&caps[1], "15");
    }

    #[test]
    fn test_separator_line() {
        assert!(SEPARATOR_LINE.is_match("----------------"));
        assert!(SEPARATOR_LINE.is_match("****"));
        assert!(!SEPARATOR_LINE.is_match("- Milk -"));
    }
}
