//! Screen geometry primitives shared by the window manager and shell.
//!
//! Coordinates are logical pixels with the origin at the top-left of the
//! viewport. Serialized forms are embedded in the profile document, so all
//! types derive serde traits.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    /// The fallback window size used when an app declares no geometry.
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Whether the rectangle contains the given point (right/bottom edges
    /// exclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.width as i32
            && p.y < self.origin.y + self.size.height as i32
    }

    /// Center `size` within this rectangle. Sizes larger than the rectangle
    /// clamp to its origin rather than going negative past it.
    pub fn center(&self, size: Size) -> Point {
        let dx = (self.size.width as i32 - size.width as i32) / 2;
        let dy = (self.size.height as i32 - size.height as i32) / 2;
        Point::new(self.origin.x + dx.max(0), self.origin.y + dy.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_new() {
        let p = Point::new(3, -4);
        assert_eq!(p.x, 3);
        assert_eq!(p.y, -4);
    }

    #[test]
    fn size_default_is_fallback_window_size() {
        assert_eq!(Size::default(), Size::new(800, 600));
    }

    #[test]
    fn rect_contains_interior_point() {
        let r = Rect::new(10, 10, 100, 50);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(109, 59)));
    }

    #[test]
    fn rect_excludes_far_edges() {
        let r = Rect::new(10, 10, 100, 50);
        assert!(!r.contains(Point::new(110, 10)));
        assert!(!r.contains(Point::new(10, 60)));
        assert!(!r.contains(Point::new(9, 10)));
    }

    #[test]
    fn center_smaller_size() {
        let r = Rect::new(0, 0, 1280, 720);
        let p = r.center(Size::new(800, 600));
        assert_eq!(p, Point::new(240, 60));
    }

    #[test]
    fn center_offset_rect() {
        let r = Rect::new(0, 28, 1280, 620);
        let p = r.center(Size::new(400, 300));
        assert_eq!(p, Point::new(440, 28 + 160));
    }

    #[test]
    fn center_oversized_clamps_to_origin() {
        let r = Rect::new(5, 5, 100, 100);
        let p = r.center(Size::new(400, 300));
        assert_eq!(p, Point::new(5, 5));
    }

    #[test]
    fn geometry_serde_roundtrip() {
        let r = Rect::new(1, 2, 3, 4);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn centered_window_stays_inside_viewport(
                vw in 100u32..4000,
                vh in 100u32..4000,
                ww in 1u32..1000,
                wh in 1u32..1000,
            ) {
                prop_assume!(ww <= vw && wh <= vh);
                let viewport = Rect::new(0, 0, vw, vh);
                let origin = viewport.center(Size::new(ww, wh));
                prop_assert!(origin.x >= 0);
                prop_assert!(origin.y >= 0);
                prop_assert!(origin.x + ww as i32 <= vw as i32);
                prop_assert!(origin.y + wh as i32 <= vh as i32);
            }
        }
    }
}
