//! Common types and utilities for RFB protocol implementation.
//!
//! This crate provides shared geometry used across the framebuffer decoder:
//! - [`Point`] - 2D point with i32 coordinates
//! - [`Rect`] - Rectangle with position and dimensions

/// A 2D point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangle defined by top-left position and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin with the given size.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Get the right edge (x + width), exclusive.
    ///
    /// Computed in i64 so that rectangles built from untrusted u16 wire
    /// values can never overflow.
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Get the bottom edge (y + height), exclusive.
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Returns the top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True if the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is contained within this rectangle.
    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && (px as i64) < self.right()
            && py >= self.y
            && (py as i64) < self.bottom()
    }

    /// True if `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained as long as its origin is within the
    /// closed bounds of `self`.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True if this rectangle lies inside a `width` x `height` surface
    /// anchored at the origin.
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        Rect::from_size(width, height).contains_rect(self)
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Returns the overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left as i64 || bottom <= top as i64 {
            return None;
        }
        Some(Rect::new(
            left,
            top,
            (right - left as i64) as u32,
            (bottom - top as i64) as u32,
        ))
    }

    /// Get the area of the rectangle.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10, 20);
        assert_eq!(p.x, 10);
        assert_eq!(p.y, 20);
        assert_eq!(p.to_string(), "(10, 20)");
    }

    #[test]
    fn test_rect() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.area(), 5000);
        assert_eq!(r.origin(), Point::new(10, 20));
        assert!(!r.is_empty());
        assert!(Rect::new(3, 3, 0, 7).is_empty());
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10, 20, 100, 50);
        assert!(r.contains_point(10, 20)); // top-left corner
        assert!(r.contains_point(109, 69)); // bottom-right minus 1
        assert!(!r.contains_point(9, 20));
        assert!(!r.contains_point(10, 19));
        assert!(!r.contains_point(110, 69)); // right edge (exclusive)
        assert!(!r.contains_point(109, 70)); // bottom edge (exclusive)
    }

    #[test]
    fn test_fits_within() {
        assert!(Rect::new(0, 0, 100, 100).fits_within(100, 100));
        assert!(Rect::new(90, 90, 10, 10).fits_within(100, 100));
        assert!(!Rect::new(90, 90, 11, 10).fits_within(100, 100));
        assert!(!Rect::new(-1, 0, 1, 1).fits_within(100, 100));
        // Zero-sized rect on the far edge is still inside
        assert!(Rect::new(100, 100, 0, 0).fits_within(100, 100));
        // Wire values at the u16 limit do not overflow
        assert!(!Rect::new(65535, 65535, 65535, 65535).fits_within(100, 100));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersection(&Rect::new(10, 0, 5, 5)), None);
        assert_eq!(a.translate(3, -2), Rect::new(3, -2, 10, 10));
    }
}
