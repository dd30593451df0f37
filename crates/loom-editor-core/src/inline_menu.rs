//! Inline selection menu placement.
//!
//! The menu is a pure function of the live selection: shown above any
//! non-collapsed selection whose rect, and the editor's, can be measured.

use serde::{Deserialize, Serialize};

use crate::caret::selection_rect;
use crate::platform::InputSurface;
use crate::types::Rect;

/// Measured size of the rendered menu.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InlineMenuLayout {
    pub menu_height: f64,
    pub vertical_margin: f64,
}

/// Menu position relative to the editor element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineMenuPosition {
    pub top: f64,
    pub left: f64,
}

/// Place the menu above `selection`, in `editor`'s coordinate space.
pub fn inline_menu_position(
    selection: &Rect,
    editor: &Rect,
    layout: InlineMenuLayout,
) -> InlineMenuPosition {
    InlineMenuPosition {
        top: selection.top
            - editor.top
            - selection.height
            - layout.menu_height
            - layout.vertical_margin,
        left: selection.left - editor.left,
    }
}

/// Where the menu should be, or `None` if it should be hidden.
pub fn inline_menu<S: InputSurface + ?Sized>(
    surface: &S,
    layout: InlineMenuLayout,
) -> Option<InlineMenuPosition> {
    let selection = selection_rect(surface)?;
    let editor = surface.bounding_box()?;
    Some(inline_menu_position(&selection, &editor, layout))
}
