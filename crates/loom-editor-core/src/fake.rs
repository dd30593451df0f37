//! In-memory [`InputSurface`] for deterministic tests.
//!
//! The fake holds markup as a string, parses it with
//! [`parse_fragment`](crate::markup::parse_fragment) on every change, and
//! counts live keydown listeners so tests can assert that every listener
//! acquired is eventually released.

use std::cell::Cell;
use std::rc::Rc;

use crate::markup::{MarkupNode, parse_fragment};
use crate::platform::{InputSurface, SurfaceError};
use crate::types::{Rect, Selection, SurfaceSelection};

#[derive(Debug)]
pub struct FakeSurface {
    mounted: bool,
    html: String,
    markup: Vec<MarkupNode>,
    selection: Option<SurfaceSelection>,
    bounds: Option<Rect>,
    restored: Option<usize>,
    writes: usize,
    listeners: Rc<Cell<usize>>,
    refuse_listeners: bool,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    /// A mounted, empty surface with no selection.
    pub fn new() -> Self {
        Self {
            mounted: true,
            html: String::new(),
            markup: Vec::new(),
            selection: None,
            bounds: None,
            restored: None,
            writes: 0,
            listeners: Rc::new(Cell::new(0)),
            refuse_listeners: false,
        }
    }

    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            ..Self::new()
        }
    }

    pub fn with_markup(mut self, html: &str) -> Self {
        self.set_markup(html);
        self
    }

    pub fn with_selection(mut self, selection: SurfaceSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Make every `listen_keydown` call fail.
    pub fn refusing_listeners(mut self) -> Self {
        self.refuse_listeners = true;
        self
    }

    /// Replace the markup as if the user (or browser) edited it.
    pub fn set_markup(&mut self, html: &str) {
        self.html = html.to_string();
        self.markup = parse_fragment(html);
    }

    /// Simulate an edit: new markup with the caret left at `caret`.
    pub fn edit(&mut self, html: &str, caret: usize) {
        self.set_markup(html);
        self.set_caret(caret);
    }

    /// Collapse the selection to `offset`, keeping any layout rects.
    pub fn set_caret(&mut self, offset: usize) {
        self.set_range(Selection::collapsed(offset));
    }

    pub fn set_range(&mut self, range: Selection) {
        match &mut self.selection {
            Some(sel) => sel.range = range,
            None => {
                self.selection = Some(SurfaceSelection {
                    range,
                    caret_rect: None,
                    bounds: None,
                })
            }
        }
    }

    pub fn set_selection(&mut self, selection: Option<SurfaceSelection>) {
        self.selection = selection;
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Markup as last set or written.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of `write_markup` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Offset passed to the last successful `restore_caret`.
    pub fn restored_caret(&self) -> Option<usize> {
        self.restored
    }

    /// Keydown listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.listeners.get()
    }

    /// Shared handle on the listener count, for observing it after the
    /// surface has been moved into an editor.
    pub fn listener_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.listeners)
    }
}

impl InputSurface for FakeSurface {
    type KeyListener = FakeKeyListener;

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn selection(&self) -> Option<SurfaceSelection> {
        self.selection.clone()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.bounds
    }

    fn plain_text(&self) -> String {
        self.markup.iter().map(MarkupNode::text_content).collect()
    }

    fn read_markup(&self) -> Result<Vec<MarkupNode>, SurfaceError> {
        Ok(self.markup.clone())
    }

    fn write_markup(&mut self, markup: &str) -> Result<(), SurfaceError> {
        self.set_markup(markup);
        self.writes += 1;
        Ok(())
    }

    fn restore_caret(&mut self, offset: usize) -> Result<(), SurfaceError> {
        let len = self.plain_text().chars().count();
        if offset > len {
            return Err(format!("caret offset {offset} past end of text ({len})").into());
        }
        self.set_caret(offset);
        self.restored = Some(offset);
        Ok(())
    }

    fn listen_keydown(&mut self) -> Result<FakeKeyListener, SurfaceError> {
        if self.refuse_listeners {
            return Err("keydown listener refused".into());
        }
        self.listeners.set(self.listeners.get() + 1);
        Ok(FakeKeyListener {
            count: Rc::clone(&self.listeners),
        })
    }
}

/// Listener guard handed out by [`FakeSurface`].
#[derive(Debug)]
pub struct FakeKeyListener {
    count: Rc<Cell<usize>>,
}

impl Drop for FakeKeyListener {
    fn drop(&mut self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}
