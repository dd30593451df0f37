//! Geometry and selection types shared by the caret tracker and both menus.
//!
//! All offsets are linear character offsets from the start of the editable
//! region (Unicode scalar values, NOT bytes or UTF-16 units). All rectangles
//! are in viewport pixels unless a function says otherwise.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A pixel position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by another point treated as a vector.
    pub fn offset_by(self, delta: Point) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

/// An axis-aligned rectangle, as returned by `getBoundingClientRect()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Express this rect in the coordinate space of `container`.
    pub fn relative_to(&self, container: &Rect) -> Rect {
        Rect::new(
            self.left - container.left,
            self.top - container.top,
            self.width,
            self.height,
        )
    }
}

/// A linear selection in the editable region.
///
/// `anchor` is the DOM selection's anchor and `head` its focus; a selection
/// dragged leftwards has `head < anchor`.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A caret at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Ordered char range covered by the selection.
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Snapshot of the live selection, as reported by an
/// [`InputSurface`](crate::InputSurface).
///
/// Every geometric field is optional: the platform may know the offsets
/// but be unable to lay out a rectangle (detached nodes, hidden text).
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSelection {
    /// Linear offsets of the selection within the editable region.
    pub range: Selection,
    /// Viewport rect of the selection's start, collapsed to a caret.
    pub caret_rect: Option<Rect>,
    /// Viewport bounding rect of the whole selected range.
    pub bounds: Option<Rect>,
}

impl SurfaceSelection {
    /// A collapsed caret at `offset` with no layout information.
    pub fn caret(offset: usize) -> Self {
        Self {
            range: Selection::collapsed(offset),
            caret_rect: None,
            bounds: None,
        }
    }

    pub fn with_caret_rect(mut self, rect: Rect) -> Self {
        self.caret_rect = Some(rect);
        self
    }

    pub fn with_bounds(mut self, rect: Rect) -> Self {
        self.bounds = Some(rect);
        self
    }

    /// The caret's linear offset: the range's end boundary.
    pub fn caret_offset(&self) -> usize {
        self.range.end()
    }

    pub fn is_collapsed(&self) -> bool {
        self.range.is_collapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftward_selection_is_ordered() {
        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert_eq!(sel.to_range(), 5..10);
        assert!(Selection::collapsed(7).is_collapsed());
    }

    #[test]
    fn test_caret_offset_is_range_end() {
        let sel = SurfaceSelection {
            range: Selection::new(9, 3),
            caret_rect: None,
            bounds: None,
        };
        assert_eq!(sel.caret_offset(), 9);
        assert!(!sel.is_collapsed());
    }

    #[test]
    fn test_rect_relative_to() {
        let editor = Rect::new(100.0, 50.0, 400.0, 300.0);
        let inner = Rect::new(120.0, 80.0, 10.0, 16.0);
        let rel = inner.relative_to(&editor);
        assert_eq!(rel, Rect::new(20.0, 30.0, 10.0, 16.0));
        assert_eq!(rel.origin(), Point::new(20.0, 30.0));
    }
}
