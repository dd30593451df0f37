//! Caret tracker: pure queries over the live selection.
//!
//! None of these fail. A missing selection is the normal "nothing to show"
//! state and maps to offset 0, the element origin, or `None`.

use crate::platform::InputSurface;
use crate::types::{Point, Rect};

/// Chars between the start of the editable region and the caret.
pub fn caret_linear_offset<S: InputSurface + ?Sized>(surface: &S) -> usize {
    surface
        .selection()
        .map(|sel| sel.caret_offset())
        .unwrap_or(0)
}

/// Caret position relative to the editable element's top-left corner.
///
/// Without a caret rect the result is the viewport origin expressed in the
/// element's coordinates, so callers can always place UI.
pub fn caret_pixel_position<S: InputSurface + ?Sized>(surface: &S) -> Point {
    let editor = surface.bounding_box().unwrap_or_default();
    let caret = surface
        .selection()
        .and_then(|sel| sel.caret_rect)
        .unwrap_or_default();
    caret.relative_to(&editor).origin()
}

/// Viewport bounding rect of a non-collapsed selection.
pub fn selection_rect<S: InputSurface + ?Sized>(surface: &S) -> Option<Rect> {
    surface
        .selection()
        .filter(|sel| !sel.is_collapsed())
        .and_then(|sel| sel.bounds)
}
