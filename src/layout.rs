//! Geometry - absolute pixel rectangles
//!
//! There is no layout solver: every element carries an absolute rectangle in
//! window coordinates, and children share their parent's coordinate space.

/// Rectangle bounds in pixels
///
/// Width and height may be zero or negative; such rectangles are degenerate
/// and contain no points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin (fills an entire window)
    pub fn fullscreen(width: i32, height: i32) -> Self {
        Rect::new(0, 0, width, height)
    }

    /// Get right edge x-coordinate (exclusive)
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Get bottom edge y-coordinate (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if point is inside rectangle
    ///
    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the rectangle has no area
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Create a subrect with padding applied on every side
    pub fn inner(&self, padding: i32) -> Self {
        let double = padding.saturating_mul(2);
        Rect {
            x: self.x.saturating_add(padding),
            y: self.y.saturating_add(padding),
            width: self.width.saturating_sub(double),
            height: self.height.saturating_sub(double),
        }
    }

    /// Intersection of two rectangles, `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let r = Rect::new(10, 20, 30, 40);
        assert!(r.contains(10, 20));
        assert!(r.contains(39, 59));
        assert!(!r.contains(40, 20));
        assert!(!r.contains(10, 60));
        assert!(!r.contains(9, 20));
        assert!(!r.contains(10, 19));
    }

    #[test]
    fn test_degenerate_contains_nothing() {
        let r = Rect::new(0, 0, -5, 10);
        assert!(r.is_degenerate());
        assert!(!r.contains(0, 0));
        assert!(!r.contains(-3, 5));
        assert!(!Rect::new(5, 5, 0, 0).contains(5, 5));
    }

    #[test]
    fn test_inner_padding() {
        let r = Rect::new(0, 0, 100, 30).inner(8);
        assert_eq!(r, Rect::new(8, 8, 84, 14));
    }

    #[test]
    fn test_inner_huge_padding_saturates() {
        let r = Rect::new(10, 10, 100, 30).inner(i32::MAX);
        assert_eq!(r.x, i32::MAX);
        assert_eq!(r.width, 100 - i32::MAX);
        assert!(r.is_degenerate());
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 5, 5)), None);
    }
}
