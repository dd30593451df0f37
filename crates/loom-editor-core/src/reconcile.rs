//! Input reconciliation.
//!
//! The surface is the source of truth and the document is a pure projection
//! of it. On every input event the reconciler re-parses the whole surface
//! into a fresh [`Document`], writes the canonical render of that document
//! back, and derives the command-menu signal from the text diff. Nothing is
//! patched incrementally, so any tree change that was not also written to
//! the surface is discarded by the next event.

use crate::caret::{caret_linear_offset, caret_pixel_position};
use crate::command_menu::MenuQuery;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::ids::{IdSource, SequentialIds};
use crate::parse::parse_markup;
use crate::platform::InputSurface;
use crate::render::render_to_markup;
use crate::types::Point;

/// What the command menu should do after an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum MenuSignal {
    /// The trigger was just typed.
    Open {
        /// Menu position relative to the editor element.
        caret: Point,
        /// Linear offset just past the trigger.
        anchor: usize,
    },
    /// The menu stays open with a new filter.
    Filter(String),
    Close,
}

/// Result of one reconciliation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// The fresh document, to be handed to the owner.
    pub document: Document,
    /// Surface text length minus tracked text length, in chars.
    pub length_delta: isize,
    /// Caret offset read before the surface was rewritten.
    pub caret: usize,
    /// Text just inserted before the caret, for pure insertions.
    pub inserted: Option<String>,
    pub menu: MenuSignal,
}

#[derive(Debug)]
pub struct Reconciler<I = SequentialIds> {
    ids: I,
    trigger: char,
    menu_offset: Point,
}

impl<I: IdSource> Reconciler<I> {
    pub fn new(ids: I, trigger: char, menu_offset: Point) -> Self {
        Self {
            ids,
            trigger,
            menu_offset,
        }
    }

    pub fn ids_mut(&mut self) -> &mut I {
        &mut self.ids
    }

    /// Rebuild the document from `surface` and normalise the surface.
    ///
    /// `current` is the last document published to the owner; `open_menu`
    /// is the command menu's state going into this event.
    pub fn reconcile<S: InputSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        current: &Document,
        open_menu: Option<&MenuQuery>,
    ) -> EditorResult<Reconciliation> {
        if !surface.is_mounted() {
            return Err(EditorError::NotMounted);
        }

        let existing_len = current.text().chars().count();
        let raw_text = surface.plain_text();
        let length_delta = raw_text.chars().count() as isize - existing_len as isize;

        // Read the caret before the write below resets the selection.
        let has_selection = surface.selection().is_some();
        let caret = caret_linear_offset(surface);
        let caret_point = caret_pixel_position(surface);

        let markup = surface.read_markup()?;
        let document = parse_markup(&markup, &mut self.ids);
        surface.write_markup(&render_to_markup(&document))?;

        if has_selection {
            // Dropped markup can shorten the text; never restore past its end.
            let restore_to = caret.min(document.text().chars().count());
            if let Err(err) = surface.restore_caret(restore_to) {
                tracing::warn!(target: "loom::reconcile", %err, restore_to, "caret restore failed");
            }
        }

        let inserted = (length_delta > 0)
            .then(|| inserted_text(&raw_text, caret, length_delta.unsigned_abs()));
        let menu = match &inserted {
            None => MenuSignal::Close,
            Some(text) if is_single(text, self.trigger) => MenuSignal::Open {
                caret: caret_point.offset_by(self.menu_offset),
                anchor: caret,
            },
            Some(_) => open_menu
                .and_then(|query| {
                    continued_filter(&raw_text, query.anchor, caret, self.trigger)
                })
                .map_or(MenuSignal::Close, MenuSignal::Filter),
        };

        tracing::debug!(
            target: "loom::reconcile",
            length_delta,
            caret,
            nodes = document.len(),
            ?menu,
            "reconciled surface"
        );

        Ok(Reconciliation {
            document,
            length_delta,
            caret,
            inserted,
            menu,
        })
    }
}

fn is_single(text: &str, c: char) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(c) && chars.next().is_none()
}

/// The `len` chars of `text` ending at char offset `caret`.
///
/// Out-of-range offsets are clamped rather than rejected, since the caret
/// and the text come from separate best-effort reads.
pub fn inserted_text(text: &str, caret: usize, len: usize) -> String {
    let end = caret.min(text.chars().count());
    let start = end.saturating_sub(len);
    text.chars().skip(start).take(end - start).collect()
}

/// The filter for an open menu whose trigger ends at `anchor`, given the
/// caret now sits at `caret`.
///
/// `None` when the caret moved before the trigger, the trigger itself is
/// gone, or the typed text contains whitespace or another trigger.
pub fn continued_filter(text: &str, anchor: usize, caret: usize, trigger: char) -> Option<String> {
    if anchor == 0 || caret < anchor {
        return None;
    }
    let mut chars = text.chars().skip(anchor - 1);
    if chars.next() != Some(trigger) {
        return None;
    }
    let filter: String = chars.take(caret - anchor).collect();
    if filter.chars().count() != caret - anchor
        || filter.chars().any(|c| c.is_whitespace() || c == trigger)
    {
        return None;
    }
    Some(filter)
}
