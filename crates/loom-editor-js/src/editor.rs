//! JsEditor - the main editor wrapper for JavaScript.

use std::cell::RefCell;

use loom_editor_browser::{Document, EditorConfig, FormatCommand, MountedEditor, SmolStr};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::actions::{ActionKind, parse_action, parse_kind};
use crate::types::{callbacks_from_js, from_js_or_default, to_js};

/// The main editor instance exposed to JavaScript.
///
/// Holds the document while unmounted. Once mounted, the document lives in
/// the [`MountedEditor`] and changes are reported through `onChange`.
///
/// Methods reachable from inside a callback take `&self`.
#[wasm_bindgen]
pub struct JsEditor {
    config: EditorConfig,
    document: RefCell<Document>,
    mounted: Option<MountedEditor>,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor from an optional document and config.
    #[wasm_bindgen(constructor)]
    pub fn new(document: JsValue, config: JsValue) -> Result<JsEditor, JsError> {
        Ok(Self {
            config: from_js_or_default(config, "config")?,
            document: RefCell::new(from_js_or_default(document, "document")?),
            mounted: None,
        })
    }

    // === Lifecycle ===

    /// Mount into an existing contentEditable element.
    ///
    /// `onChange(document)` fires after every edit. `onCommandMenu(view)` and
    /// `onInlineMenu(position)` receive `null` when their menu is hidden.
    #[wasm_bindgen]
    pub fn mount(
        &mut self,
        element: HtmlElement,
        on_change: Option<js_sys::Function>,
        on_command_menu: Option<js_sys::Function>,
        on_inline_menu: Option<js_sys::Function>,
    ) -> Result<(), JsError> {
        if self.mounted.is_some() {
            return Err(JsError::new("Editor is already mounted"));
        }
        let callbacks = callbacks_from_js(on_change, on_command_menu, on_inline_menu);
        let mounted = MountedEditor::mount(
            element,
            self.document.borrow().clone(),
            self.config.clone(),
            callbacks,
        )
        .map_err(|e| JsError::new(&format!("Mount failed: {}", e)))?;
        self.mounted = Some(mounted);
        Ok(())
    }

    /// Check if the editor is mounted.
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Detach all listeners. The last document is kept.
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            if let Some(document) = mounted.document() {
                self.document.replace(document);
            }
            mounted.unmount();
        }
    }

    // === Content access ===

    /// Get the current document.
    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<JsValue, JsError> {
        to_js(&self.current_document())
    }

    /// Replace the document and re-render.
    #[wasm_bindgen(js_name = setDocument)]
    pub fn set_document(&self, document: JsValue) -> Result<(), JsError> {
        let document: Document = from_js_or_default(document, "document")?;
        match &self.mounted {
            Some(mounted) => mounted
                .set_document(document)
                .map_err(|e| JsError::new(&format!("Render failed: {}", e))),
            None => {
                self.document.replace(document);
                Ok(())
            }
        }
    }

    /// Get the plain text of the document.
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.current_document().text()
    }

    // === Actions ===

    /// Execute an action object (see `JsEditorAction`).
    #[wasm_bindgen(js_name = executeAction)]
    pub fn execute_action(&self, action: JsValue) -> Result<bool, JsError> {
        let action = parse_action(action)?;
        match action.to_action_kind() {
            Some(ActionKind::Format(command)) => self.format(&command),
            Some(ActionKind::Insert(kind)) => {
                self.mounted()?
                    .insert_node(kind)
                    .map_err(|e| JsError::new(&format!("Insert failed: {}", e)))?;
                Ok(true)
            }
            None => Err(JsError::new("Unknown node kind")),
        }
    }

    /// Toggle bold over the selection. Returns false for an empty selection.
    #[wasm_bindgen(js_name = toggleBold)]
    pub fn toggle_bold(&self) -> Result<bool, JsError> {
        self.format(&FormatCommand::ToggleBold)
    }

    /// Link the selection to `href`. Returns false for an empty selection.
    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&self, href: &str) -> Result<bool, JsError> {
        self.format(&FormatCommand::Link {
            href: SmolStr::new(href),
        })
    }

    /// Append a blank node by command key (`"paragraph"`, `"image"`, ...).
    #[wasm_bindgen(js_name = insertNode)]
    pub fn insert_node(&self, kind: &str) -> Result<(), JsError> {
        let kind = parse_kind(kind)?;
        self.mounted()?
            .insert_node(kind)
            .map_err(|e| JsError::new(&format!("Insert failed: {}", e)))
    }

    /// Report the rendered height of the inline menu, for placement.
    #[wasm_bindgen(js_name = setInlineMenuHeight)]
    pub fn set_inline_menu_height(&self, height: f64) {
        if let Some(mounted) = &self.mounted {
            mounted.set_inline_menu_height(height);
        }
    }
}

impl JsEditor {
    fn current_document(&self) -> Document {
        self.mounted
            .as_ref()
            .and_then(MountedEditor::document)
            .unwrap_or_else(|| self.document.borrow().clone())
    }

    fn mounted(&self) -> Result<&MountedEditor, JsError> {
        self.mounted
            .as_ref()
            .ok_or_else(|| JsError::new("Editor is not mounted"))
    }

    fn format(&self, command: &FormatCommand) -> Result<bool, JsError> {
        self.mounted()?
            .apply_format(command)
            .map_err(|e| JsError::new(&format!("Format failed: {}", e)))
    }
}
