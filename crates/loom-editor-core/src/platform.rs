//! Platform abstraction for the editable surface.
//!
//! [`InputSurface`] is everything the editor needs from the host UI: read the
//! live markup and selection, replace the markup, put the caret back and
//! listen for keys. The browser crate implements it over a `contenteditable`
//! element; [`FakeSurface`](crate::fake::FakeSurface) implements it in memory.

use crate::markup::MarkupNode;
use crate::types::{Rect, SurfaceSelection};

/// Error type for surface operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceError(pub String);

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SurfaceError {}

impl From<&str> for SurfaceError {
    fn from(s: &str) -> Self {
        SurfaceError(s.to_string())
    }
}

impl From<String> for SurfaceError {
    fn from(s: String) -> Self {
        SurfaceError(s)
    }
}

/// The editable region as seen by the editor.
///
/// Offsets are linear char offsets into [`plain_text`](Self::plain_text).
/// Rectangles are viewport pixels.
pub trait InputSurface {
    /// Guard returned by [`listen_keydown`](Self::listen_keydown).
    ///
    /// The listener stays attached exactly as long as the guard is alive.
    type KeyListener;

    /// Whether the surface is attached to a live element.
    fn is_mounted(&self) -> bool;

    /// The current selection, if it lies inside the editable region.
    fn selection(&self) -> Option<SurfaceSelection>;

    /// Bounding box of the editable region itself.
    fn bounding_box(&self) -> Option<Rect>;

    /// Text content of the region: every text node concatenated in order.
    fn plain_text(&self) -> String;

    /// Structured snapshot of the region's children.
    fn read_markup(&self) -> Result<Vec<MarkupNode>, SurfaceError>;

    /// Replace the region's children with `markup`.
    fn write_markup(&mut self, markup: &str) -> Result<(), SurfaceError>;

    /// Collapse the selection to `offset` within the region.
    fn restore_caret(&mut self, offset: usize) -> Result<(), SurfaceError>;

    /// Attach a document-level keydown listener.
    ///
    /// Key events are routed to the owner of the editor by the surface
    /// implementation; the guard only controls the listener's lifetime.
    fn listen_keydown(&mut self) -> Result<Self::KeyListener, SurfaceError>;
}
