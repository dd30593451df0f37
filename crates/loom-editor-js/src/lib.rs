//! WASM bindings for the loom rich-text editor.
//!
//! Provides an embeddable editor for JavaScript/TypeScript apps: mount it on
//! a contentEditable element, then follow the document and both menus through
//! callbacks.

mod actions;
mod editor;
mod types;

pub use actions::*;
pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    loom_editor_browser::init_logging();
}
