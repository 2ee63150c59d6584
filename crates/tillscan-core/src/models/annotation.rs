//! OCR annotation geometry and the parser input document.

use serde::{Deserialize, Serialize};

/// A single corner of an OCR bounding quadrilateral, in image pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

/// A single OCR-detected word/token with its quadrilateral bounding box.
///
/// The first annotation in a full set (index 0) represents the entire
/// detected text blob and must be excluded from per-word computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordAnnotation {
    /// Recognized token text.
    pub text: String,

    /// Quadrilateral corners in image pixel coordinates.
    pub vertices: [Vertex; 4],
}

impl WordAnnotation {
    /// Axis-aligned bounding rectangle of the quadrilateral.
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        let xs = self.vertices.map(|v| v.x);
        let ys = self.vertices.map(|v| v.y);

        let min_x = xs.iter().copied().min().unwrap_or(0);
        let max_x = xs.iter().copied().max().unwrap_or(0);
        let min_y = ys.iter().copied().min().unwrap_or(0);
        let max_y = ys.iter().copied().max().unwrap_or(0);

        (min_x, min_y, max_x, max_y)
    }
}

/// Axis-aligned crop rectangle for one parsed item, in image pixels.
///
/// The all-zero box is a sentinel meaning "no crop available" and must not
/// be treated as a valid one-pixel region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// The "no crop available" sentinel.
    pub const SENTINEL: BoundingBox = BoundingBox {
        min_x: 0,
        min_y: 0,
        max_x: 0,
        max_y: 0,
    };

    /// Whether this is the "no crop available" sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

/// The `(lines, annotations)` pair handed over by the OCR collaborator.
///
/// `lines` are trimmed, non-empty, in top-to-bottom reading order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Text lines in reading order.
    pub lines: Vec<String>,

    /// Per-word bounding boxes; index 0 is the whole-blob annotation.
    #[serde(default)]
    pub annotations: Vec<WordAnnotation>,
}
