//! Conversions between core types and JavaScript values.

use loom_editor_browser::{CommandMenuView, Document, EditorCallbacks, InlineMenuPosition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// Serialize to a plain JS object (maps become objects, not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Deserialize from a JS value, treating `undefined`/`null` as the default.
pub fn from_js_or_default<T: DeserializeOwned + Default>(
    value: JsValue,
    what: &str,
) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid {}: {}", what, e)))
}

/// Call `callback` with one serialized argument, logging failures.
fn call_with<T: Serialize + ?Sized>(callback: &js_sys::Function, value: Option<&T>) {
    let arg = match value.map(to_js).transpose() {
        Ok(arg) => arg.unwrap_or(JsValue::NULL),
        Err(_) => {
            tracing::error!(target: "loom::js", "failed to serialize callback argument");
            return;
        }
    };
    if let Err(err) = callback.call1(&JsValue::NULL, &arg) {
        tracing::error!(target: "loom::js", ?err, "callback threw");
    }
}

/// Build editor callbacks from optional JS functions.
pub fn callbacks_from_js(
    on_change: Option<js_sys::Function>,
    on_command_menu: Option<js_sys::Function>,
    on_inline_menu: Option<js_sys::Function>,
) -> EditorCallbacks {
    let mut callbacks = EditorCallbacks::default();
    if let Some(f) = on_change {
        callbacks.on_change = Box::new(move |doc: &Document| call_with(&f, Some(doc)));
    }
    if let Some(f) = on_command_menu {
        callbacks.on_command_menu =
            Box::new(move |view: Option<&CommandMenuView>| call_with(&f, view));
    }
    if let Some(f) = on_inline_menu {
        callbacks.on_inline_menu = Box::new(move |position: Option<InlineMenuPosition>| {
            call_with(&f, position.as_ref())
        });
    }
    callbacks
}
