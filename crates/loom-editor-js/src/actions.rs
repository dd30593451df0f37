//! Editor action conversion for JavaScript.

use loom_editor_core::{FormatCommand, NodeKind, SmolStr};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// JavaScript-friendly editor action.
///
/// `{ type: "toggleBold" }`, `{ type: "insertLink", href }` or
/// `{ type: "insertNode", kind }` where `kind` is a command key such as
/// `"image"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsEditorAction {
    ToggleBold,
    InsertLink { href: String },
    InsertNode { kind: String },
}

/// What an action asks the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Inline formatting over the current selection.
    Format(FormatCommand),
    /// Append a blank node.
    Insert(NodeKind),
}

impl JsEditorAction {
    /// Convert to an [`ActionKind`], or `None` for an unknown node kind.
    pub fn to_action_kind(&self) -> Option<ActionKind> {
        match self {
            Self::ToggleBold => Some(ActionKind::Format(FormatCommand::ToggleBold)),
            Self::InsertLink { href } => Some(ActionKind::Format(FormatCommand::Link {
                href: SmolStr::new(href),
            })),
            Self::InsertNode { kind } => NodeKind::from_key(kind).map(ActionKind::Insert),
        }
    }
}

/// Parse a JsValue into a JsEditorAction.
pub fn parse_action(value: JsValue) -> Result<JsEditorAction, JsError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid action: {}", e)))
}

/// Parse a command key into a node kind.
pub fn parse_kind(kind: &str) -> Result<NodeKind, JsError> {
    NodeKind::from_key(kind).ok_or_else(|| JsError::new(&format!("Unknown node kind: {}", kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_actions_map_to_commands() {
        assert_eq!(
            JsEditorAction::ToggleBold.to_action_kind(),
            Some(ActionKind::Format(FormatCommand::ToggleBold))
        );
        assert_eq!(
            JsEditorAction::InsertLink {
                href: "https://example.com".into()
            }
            .to_action_kind(),
            Some(ActionKind::Format(FormatCommand::Link {
                href: "https://example.com".into()
            }))
        );
    }

    #[test]
    fn insert_node_uses_command_keys() {
        let action = JsEditorAction::InsertNode {
            kind: "table".into(),
        };
        assert_eq!(action.to_action_kind(), Some(ActionKind::Insert(NodeKind::Table)));

        let unknown = JsEditorAction::InsertNode {
            kind: "video".into(),
        };
        assert_eq!(unknown.to_action_kind(), None);
    }

    #[test]
    fn action_json_shape() {
        let action: JsEditorAction =
            serde_json::from_str(r#"{"type":"insertNode","kind":"image"}"#).unwrap();
        assert_eq!(
            action,
            JsEditorAction::InsertNode {
                kind: "image".into()
            }
        );
        let json = serde_json::to_string(&JsEditorAction::ToggleBold).unwrap();
        assert_eq!(json, r#"{"type":"toggleBold"}"#);
    }
}
