//! A mounted editor: the core `Editor`, its document, and its DOM listeners.
//!
//! Event handlers borrow the shared state for the duration of one core call
//! and release it before running host callbacks, so callbacks may call back
//! into the editor (for instance to replace the document).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use loom_editor_core::{
    CommandMenuView, Document, DocumentHost, DocumentUpdate, Editor, EditorConfig, EditorResult,
    FormatCommand, InlineMenuPosition, KeydownResult, NodeKind, OwnedDocument, UuidIds,
};

use crate::events::key_combo_from_event;
use crate::surface::BrowserSurface;

/// Host notifications.
pub struct EditorCallbacks {
    /// Called with the full document after every change.
    pub on_change: Box<dyn Fn(&Document)>,
    /// Called with the command menu state after every input or key event.
    pub on_command_menu: Box<dyn Fn(Option<&CommandMenuView>)>,
    /// Called with the inline menu position after every input or selection
    /// change.
    pub on_inline_menu: Box<dyn Fn(Option<InlineMenuPosition>)>,
}

impl Default for EditorCallbacks {
    fn default() -> Self {
        Self {
            on_change: Box::new(|_: &Document| {}),
            on_command_menu: Box::new(|_: Option<&CommandMenuView>| {}),
            on_inline_menu: Box::new(|_: Option<InlineMenuPosition>| {}),
        }
    }
}

struct State {
    editor: Editor<BrowserSurface, UuidIds>,
    host: OwnedDocument,
}

/// Everything a callback needs, captured while the state is borrowed.
struct Snapshot {
    document: Option<Document>,
    command_menu: Option<CommandMenuView>,
    inline_menu: Option<InlineMenuPosition>,
}

impl State {
    fn snapshot(&self, changed: bool) -> Snapshot {
        Snapshot {
            document: changed.then(|| self.host.current().clone()),
            command_menu: self.editor.menu_view(),
            inline_menu: self.editor.inline_menu(),
        }
    }
}

struct Shared {
    state: RefCell<State>,
    callbacks: EditorCallbacks,
}

impl Shared {
    /// Run `f` against the state, or log and skip if it is already borrowed.
    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> Option<T> {
        match self.state.try_borrow_mut() {
            Ok(mut state) => Some(f(&mut state)),
            Err(_) => {
                tracing::warn!(target: "loom::mount", "editor state busy, dropping event");
                None
            }
        }
    }

    fn notify(&self, snapshot: Snapshot) {
        if let Some(document) = &snapshot.document {
            (self.callbacks.on_change)(document);
        }
        (self.callbacks.on_command_menu)(snapshot.command_menu.as_ref());
        (self.callbacks.on_inline_menu)(snapshot.inline_menu);
    }

    fn on_input(&self) {
        let Some(snapshot) = self.with_state(|state| {
            let State { editor, host } = &mut *state;
            if let Err(err) = editor.handle_input(host) {
                tracing::error!(target: "loom::mount", %err, "input reconciliation failed");
            }
            state.snapshot(true)
        }) else {
            return;
        };
        self.notify(snapshot);
    }

    fn on_keydown(&self, event: &web_sys::KeyboardEvent) {
        let combo = key_combo_from_event(event);
        let Some((result, snapshot)) = self.with_state(|state| {
            let revision = state.host.revision();
            let State { editor, host } = &mut *state;
            let result = editor.handle_key(&combo, host);
            let changed = state.host.revision() != revision;
            (result, state.snapshot(changed))
        }) else {
            return;
        };
        match result {
            Ok(KeydownResult::Handled) => event.prevent_default(),
            Ok(KeydownResult::NotHandled) => {}
            Err(err) => tracing::error!(target: "loom::mount", %err, "keydown handling failed"),
        }
        self.notify(snapshot);
    }

    fn on_selection_change(&self) {
        let Some(position) = self.with_state(|state| state.editor.inline_menu()) else {
            return;
        };
        (self.callbacks.on_inline_menu)(position);
    }
}

/// An editor attached to a live element.
///
/// Dropping it (or calling [`unmount`](Self::unmount)) detaches every DOM
/// listener, including the command menu's document-level keydown listener.
pub struct MountedEditor {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
}

impl MountedEditor {
    /// Render `document` into `element` and start listening for input.
    pub fn mount(
        element: web_sys::HtmlElement,
        document: Document,
        config: EditorConfig,
        callbacks: EditorCallbacks,
    ) -> EditorResult<Self> {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            let surface = BrowserSurface::with_key_handler(element.clone(), move |event| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_keydown(event);
                }
            });
            Shared {
                state: RefCell::new(State {
                    editor: Editor::new(surface, config, UuidIds),
                    host: OwnedDocument::new(document),
                }),
                callbacks,
            }
        });

        {
            let mut state = shared.state.borrow_mut();
            let State { editor, host } = &mut *state;
            editor.mount(host)?;
        }

        let mut listeners = Vec::with_capacity(2);
        let weak = Rc::downgrade(&shared);
        listeners.push(EventListener::new(&element, "input", move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.on_input();
            }
        }));
        if let Some(dom_document) = element.owner_document() {
            let weak = Rc::downgrade(&shared);
            listeners.push(EventListener::new(&dom_document, "selectionchange", move |_| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_selection_change();
                }
            }));
        }

        tracing::debug!(target: "loom::mount", "editor mounted");
        Ok(Self { shared, listeners })
    }

    /// A copy of the current document.
    pub fn document(&self) -> Option<Document> {
        self.shared.with_state(|state| state.host.current().clone())
    }

    /// Replace the document from outside and re-render the surface.
    pub fn set_document(&self, document: Document) -> EditorResult<()> {
        self.shared
            .with_state(|state| {
                let State { editor, host } = &mut *state;
                host.set(DocumentUpdate::Replace(document));
                editor.sync_surface(host)
            })
            .unwrap_or(Ok(()))
    }

    /// Apply an inline format to the current selection.
    pub fn apply_format(&self, command: &FormatCommand) -> EditorResult<bool> {
        let Some(result) = self.shared.with_state(|state| {
            let State { editor, host } = &mut *state;
            let applied = editor.apply_format(command, host);
            (applied, state.snapshot(true))
        }) else {
            return Ok(false);
        };
        let (applied, snapshot) = result;
        if matches!(applied, Ok(true)) {
            self.shared.notify(snapshot);
        }
        applied
    }

    /// Append a blank node of `kind`, as if chosen from the command menu.
    pub fn insert_node(&self, kind: NodeKind) -> EditorResult<()> {
        let Some((result, snapshot)) = self.shared.with_state(|state| {
            let State { editor, host } = &mut *state;
            let result = editor.insert_node(kind, host);
            (result, state.snapshot(true))
        }) else {
            return Ok(());
        };
        self.shared.notify(snapshot);
        result
    }

    pub fn set_inline_menu_height(&self, height: f64) {
        self.shared
            .with_state(|state| state.editor.set_inline_menu_height(height));
    }

    /// Detach all listeners and close the command menu.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedEditor {
    fn drop(&mut self) {
        self.listeners.clear();
        self.shared.with_state(|state| state.editor.unmount());
        tracing::debug!(target: "loom::mount", "editor unmounted");
    }
}
