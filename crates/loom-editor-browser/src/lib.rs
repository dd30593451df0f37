//! Browser DOM layer for the loom editor.
//!
//! Implements the core's [`InputSurface`] over a contentEditable element and
//! wires DOM events into an [`Editor`]. Assumes a `wasm32-unknown-unknown`
//! target.
//!
//! # Architecture
//!
//! - `cursor`: Selection API reads and caret restoration
//! - `dom_sync`: live DOM to markup-tree snapshots
//! - `events`: keydown translation
//! - `surface`: the `InputSurface` implementation
//! - `mount`: listeners, shared state and host callbacks
//! - `logging`: console subscriber setup
//!
//! # Re-exports
//!
//! This crate re-exports `loom-editor-core` for convenience, so consumers
//! only need to depend on `loom-editor-browser`.

pub use loom_editor_core;
pub use loom_editor_core::*;

pub mod cursor;
pub mod dom_sync;
pub mod events;
pub mod logging;
pub mod mount;
pub mod surface;

pub use events::{key_combo_from_event, parse_browser_key};
pub use logging::init_logging;
pub use mount::{EditorCallbacks, MountedEditor};
pub use surface::BrowserSurface;
