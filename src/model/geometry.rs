//! Pixel geometry shared by blocks and lines.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in page pixel coordinates.
///
/// Parsed boxes always satisfy `left < right` and `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// Right edge
    pub right: u32,
    /// Bottom edge
    pub bottom: u32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Check the `left < right`, `top < bottom` invariant.
    pub fn is_valid(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Length of the overlap of the two vertical extents (0 when disjoint).
    pub fn vertical_overlap(&self, other: &BoundingBox) -> u32 {
        let top = self.top.max(other.top);
        let bottom = self.bottom.min(other.bottom);
        bottom.saturating_sub(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_validity() {
        assert!(BoundingBox::new(144, 62, 1358, 2114).is_valid());
        assert!(!BoundingBox::new(10, 10, 10, 20).is_valid());
        assert!(!BoundingBox::new(10, 30, 20, 20).is_valid());
    }

    #[test]
    fn test_bbox_union_and_overlap() {
        let a = BoundingBox::new(0, 100, 50, 140);
        let b = BoundingBox::new(60, 110, 90, 150);
        assert_eq!(a.union(&b), BoundingBox::new(0, 100, 90, 150));
        assert_eq!(a.vertical_overlap(&b), 30);

        let c = BoundingBox::new(0, 200, 10, 220);
        assert_eq!(a.vertical_overlap(&c), 0);
        assert_eq!(c.width(), 10);
        assert_eq!(c.height(), 20);
    }
}
