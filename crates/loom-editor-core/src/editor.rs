//! The editor: one surface, one reconciler, one command menu.
//!
//! `Editor` never owns the document. Every operation reads the current
//! document from a [`DocumentHost`] and hands changes back through
//! [`DocumentHost::set`].

use crate::actions::{FormatCommand, KeyCombo, KeydownResult};
use crate::command_menu::{CommandMenu, CommandMenuView, MenuKeyOutcome, blank_node};
use crate::config::EditorConfig;
use crate::document::{DocumentHost, DocumentUpdate, NodeKind};
use crate::error::{EditorError, EditorResult};
use crate::formatting::apply_format;
use crate::ids::{IdSource, SequentialIds};
use crate::inline_menu::{InlineMenuLayout, InlineMenuPosition, inline_menu};
use crate::platform::InputSurface;
use crate::reconcile::{MenuSignal, Reconciler, Reconciliation};
use crate::render::render_to_markup;
use crate::types::Point;

pub struct Editor<S: InputSurface, I = SequentialIds> {
    surface: S,
    reconciler: Reconciler<I>,
    menu: CommandMenu,
    /// Held exactly while the command menu is open.
    key_listener: Option<S::KeyListener>,
    inline_layout: InlineMenuLayout,
}

impl<S: InputSurface, I: IdSource> Editor<S, I> {
    pub fn new(surface: S, config: EditorConfig, ids: I) -> Self {
        Self {
            surface,
            reconciler: Reconciler::new(ids, config.trigger, config.menu_offset),
            menu: CommandMenu::new(config.commands),
            key_listener: None,
            inline_layout: InlineMenuLayout {
                menu_height: 0.0,
                vertical_margin: config.inline_menu_margin,
            },
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn menu_view(&self) -> Option<CommandMenuView> {
        self.menu.view()
    }

    /// Whether a keydown listener is currently attached.
    pub fn is_listening(&self) -> bool {
        self.key_listener.is_some()
    }

    /// Render the host's document onto the surface.
    pub fn mount<H: DocumentHost + ?Sized>(&mut self, host: &H) -> EditorResult<()> {
        self.sync_surface(host)
    }

    /// Rewrite the surface from the host's document, keeping the caret.
    pub fn sync_surface<H: DocumentHost + ?Sized>(&mut self, host: &H) -> EditorResult<()> {
        if !self.surface.is_mounted() {
            return Err(EditorError::NotMounted);
        }
        let caret = self.surface.selection().map(|sel| sel.caret_offset());
        let doc = host.current();
        self.surface.write_markup(&render_to_markup(doc))?;
        if let Some(caret) = caret {
            let restore_to = caret.min(doc.text().chars().count());
            if let Err(err) = self.surface.restore_caret(restore_to) {
                tracing::warn!(target: "loom::editor", %err, restore_to, "caret restore failed");
            }
        }
        Ok(())
    }

    /// Handle an input event on the surface.
    ///
    /// Publishes the rebuilt document to `host` and updates the command menu.
    pub fn handle_input<H: DocumentHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> EditorResult<Reconciliation> {
        let rec = self
            .reconciler
            .reconcile(&mut self.surface, host.current(), self.menu.query())?;
        host.set(DocumentUpdate::Replace(rec.document.clone()));

        match &rec.menu {
            MenuSignal::Open { caret, anchor } => self.open_menu(*caret, *anchor)?,
            MenuSignal::Filter(filter) => self.menu.set_filter(filter.clone()),
            MenuSignal::Close => self.close_menu(),
        }
        Ok(rec)
    }

    /// Route a keydown to the command menu.
    pub fn handle_key<H: DocumentHost + ?Sized>(
        &mut self,
        combo: &KeyCombo,
        host: &mut H,
    ) -> EditorResult<KeydownResult> {
        match self.menu.handle_key(combo) {
            MenuKeyOutcome::NotHandled => Ok(KeydownResult::NotHandled),
            MenuKeyOutcome::Moved(_) => Ok(KeydownResult::Handled),
            MenuKeyOutcome::Chosen(kind) => {
                self.release_listener();
                self.insert_node(kind, host)?;
                Ok(KeydownResult::Handled)
            }
            MenuKeyOutcome::Dismissed => {
                self.release_listener();
                Ok(KeydownResult::Handled)
            }
        }
    }

    /// Append a blank node of `kind` to the end of the document.
    ///
    /// Insertion ignores the caret: the node always lands last, and the
    /// trigger text stays where it was typed.
    pub fn insert_node<H: DocumentHost + ?Sized>(
        &mut self,
        kind: NodeKind,
        host: &mut H,
    ) -> EditorResult<()> {
        let taken = host.current().id_set();
        let node = blank_node(kind, self.reconciler.ids_mut(), &taken);
        tracing::debug!(target: "loom::editor", %kind, id = %node.id(), "appending node");
        host.set(DocumentUpdate::map(move |prev| prev.with_appended(node)));
        self.sync_surface(host)
    }

    /// Apply an inline format to the current selection.
    ///
    /// Returns `false` (and changes nothing) when the selection is missing
    /// or collapsed.
    pub fn apply_format<H: DocumentHost + ?Sized>(
        &mut self,
        command: &FormatCommand,
        host: &mut H,
    ) -> EditorResult<bool> {
        let Some(selection) = self.surface.selection().filter(|sel| !sel.is_collapsed()) else {
            return Ok(false);
        };
        let next = apply_format(
            host.current(),
            selection.range,
            command,
            self.reconciler.ids_mut(),
        );
        host.set(DocumentUpdate::Replace(next));
        self.surface.write_markup(&render_to_markup(host.current()))?;
        if let Err(err) = self.surface.restore_caret(selection.range.end()) {
            tracing::warn!(target: "loom::editor", %err, "caret restore failed");
        }
        Ok(true)
    }

    /// Where the inline selection menu should be, if visible.
    pub fn inline_menu(&self) -> Option<InlineMenuPosition> {
        inline_menu(&self.surface, self.inline_layout)
    }

    /// Record the rendered height of the inline menu.
    pub fn set_inline_menu_height(&mut self, height: f64) {
        self.inline_layout.menu_height = height;
    }

    /// Close the menu and release any listener.
    pub fn unmount(&mut self) {
        self.close_menu();
    }

    fn open_menu(&mut self, caret: Point, anchor: usize) -> EditorResult<()> {
        self.menu.open(caret, anchor);
        if self.key_listener.is_none() {
            match self.surface.listen_keydown() {
                Ok(listener) => {
                    tracing::debug!(target: "loom::editor", "acquired keydown listener");
                    self.key_listener = Some(listener);
                }
                Err(err) => {
                    self.menu.close();
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    fn close_menu(&mut self) {
        self.menu.close();
        self.release_listener();
    }

    fn release_listener(&mut self) {
        if self.key_listener.take().is_some() {
            tracing::debug!(target: "loom::editor", "released keydown listener");
        }
    }
}
