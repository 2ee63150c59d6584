//! Bounding-box resolution for parsed items.
//!
//! Given the word annotations for a receipt image and the text fragments
//! that make up one logical item, finds the minimal enclosing rectangle so
//! the review UI can crop a preview of that line item. Pure function; safe
//! to call per item in any order.

use crate::models::{BoundingBox, WordAnnotation};

/// Outward padding applied to a resolved rectangle, in pixels.
const PADDING: i32 = 5;

/// Resolve the enclosing rectangle over every annotation matching one of
/// the item's text fragments.
///
/// The first annotation is the whole-blob entry and is always excluded.
/// Matching is bidirectional substring containment: OCR sometimes splits a
/// fragment into several tokens (annotation text inside the fragment) and
/// sometimes merges several fragments into one token (fragment inside the
/// annotation text). Returns the all-zero sentinel when nothing matches.
pub fn resolve_bounds(annotations: &[WordAnnotation], fragments: &[&str]) -> BoundingBox {
    let words = match annotations {
        [] => return BoundingBox::SENTINEL,
        [_blob, rest @ ..] => rest,
    };

    let mut found = false;
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);

    for fragment in fragments {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        for word in words {
            let text = word.text.trim();
            if text.is_empty() {
                continue;
            }

            if !fragment.contains(text) && !text.contains(fragment) {
                continue;
            }

            found = true;
            let (x1, y1, x2, y2) = word.rect();
            min_x = min_x.min(x1);
            min_y = min_y.min(y1);
            max_x = max_x.max(x2);
            max_y = max_y.max(y2);
        }
    }

    if !found {
        return BoundingBox::SENTINEL;
    }

    BoundingBox {
        min_x: (min_x - PADDING).max(0),
        min_y: (min_y - PADDING).max(0),
        max_x: max_x + PADDING,
        max_y: max_y + PADDING,
    }
}
