//! Geometry primitives shared by the layout engine, the pointer loop and the
//! X backend. Coordinates are signed to mirror dwm's `int x, y, w, h`:
//! windows can sit partially off-screen during drags, only width/height are
//! clamped to be positive.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An x,y coordinate pair
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: i32,
    /// An absolute y coordinate relative to the root window
    pub y: i32,
}

impl Point {
    /// Create a new Point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from(raw: (i32, i32)) -> Self {
        let (x, y) = raw;
        Self { x, y }
    }
}

// A Rect converts to its top left corner
impl From<Rect> for Point {
    fn from(r: Rect) -> Self {
        let Rect { x, y, .. } = r;
        Self { x, y }
    }
}

/// An X window / screen position: top left corner + extent.
///
/// `w`/`h` are the content dimensions (border width is tracked separately on
/// [`crate::pure::client::Client`]), matching dwm's `WIDTH`/`HEIGHT` macros
/// which add `2 * border_width` on top of these fields.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    /// The x-coordinate of the top left corner of this rect
    pub x: i32,
    /// The y-coordinate of the top left corner of this rect
    pub y: i32,
    /// The width of this rect
    pub w: i32,
    /// The height of this rect
    pub h: i32,
}

impl Rect {
    /// Create a new Rect.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The width of this rect plus the given border on both sides (dwm's `WIDTH`).
    pub fn outer_w(&self, border_width: i32) -> i32 {
        self.w + 2 * border_width
    }

    /// The height of this rect plus the given border on both sides (dwm's `HEIGHT`).
    pub fn outer_h(&self, border_width: i32) -> i32 {
        self.h + 2 * border_width
    }

    /// The area of overlap between this rect and `other` (dwm's `INTERSECT`).
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let iw = (self.x + self.w).min(other.x + other.w) - self.x.max(other.x);
        let ih = (self.y + self.h).min(other.y + other.h) - self.y.max(other.y);

        iw.max(0) as i64 * ih.max(0) as i64
    }

    /// Centre this Rect inside of `enclosing`.
    pub fn centered_in(&self, enclosing: &Rect) -> Self {
        Self {
            x: enclosing.x + (enclosing.w - self.w) / 2,
            y: enclosing.y + (enclosing.h - self.h) / 2,
            ..*self
        }
    }

    /// Whether `p` falls within this rect (inclusive), matching dwm's use of
    /// `XQueryPointer`-derived coordinates against a monitor's work area.
    pub fn contains_point<P>(&self, p: P) -> bool
    where
        P: Into<Point>,
    {
        let p = p.into();
        (self.x..=(self.x + self.w)).contains(&p.x) && (self.y..=(self.y + self.h)).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(Rect::new(0, 0, 100, 100), Rect::new(0, 0, 50, 50), 2500; "partial overlap")]
    #[test_case(Rect::new(0, 0, 100, 100), Rect::new(200, 200, 10, 10), 0; "disjoint")]
    #[test_case(Rect::new(0, 0, 100, 100), Rect::new(0, 0, 100, 100), 10000; "identical")]
    #[test]
    fn intersection_area(a: Rect, b: Rect, expected: i64) {
        assert_eq!(a.intersection_area(&b), expected);
    }

    #[test]
    fn centered_in() {
        let outer = Rect::new(0, 0, 20, 20);
        let inner = Rect::new(0, 0, 10, 10);

        assert_eq!(inner.centered_in(&outer), Rect::new(5, 5, 10, 10));
    }
}
