//! loom-editor-core: Pure Rust editing core without DOM dependencies.
//!
//! This crate provides:
//! - `Document` / `ContentNode` / `TextRun` - the content tree
//! - `render_to_markup` / `parse_markup` - the surface markup codec
//! - `Reconciler` - full re-parse and canonical re-render per input event
//! - `CommandMenu` - the slash-command state machine
//! - `inline_menu` - selection menu placement
//! - `InputSurface` - the seam to the host UI, with `FakeSurface` for tests
//! - `Editor` - ties the above together over a `DocumentHost`

pub mod actions;
pub mod caret;
pub mod command_menu;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod fake;
pub mod formatting;
pub mod ids;
pub mod inline_menu;
pub mod markup;
pub mod parse;
pub mod platform;
pub mod reconcile;
pub mod render;
pub mod types;

pub use actions::{FormatCommand, Key, KeyCombo, KeydownResult, Modifiers};
pub use caret::{caret_linear_offset, caret_pixel_position, selection_rect};
pub use command_menu::{
    CommandEntry, CommandMenu, CommandMenuView, CommandRegistry, MenuKeyOutcome, MenuQuery,
    blank_node,
};
pub use config::EditorConfig;
pub use document::{
    ContentNode, Document, DocumentHost, DocumentUpdate, Marks, NodeId, NodeKind, OwnedDocument,
    TextRun,
};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use fake::{FakeKeyListener, FakeSurface};
pub use formatting::apply_format;
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use inline_menu::{InlineMenuLayout, InlineMenuPosition, inline_menu, inline_menu_position};
pub use markup::{MarkupElement, MarkupNode, parse_fragment};
pub use parse::parse_markup;
pub use platform::{InputSurface, SurfaceError};
pub use reconcile::{MenuSignal, Reconciler, Reconciliation};
pub use render::{render_into, render_to_markup};
pub use smol_str::SmolStr;
pub use types::{Point, Rect, Selection, SurfaceSelection};
