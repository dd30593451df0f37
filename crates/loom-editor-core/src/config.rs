//! Editor configuration.
//!
//! Hosts may supply any subset of fields; the rest take their defaults.

use serde::{Deserialize, Serialize};

use crate::command_menu::CommandRegistry;
use crate::types::Point;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Character that opens the command menu when freshly typed.
    pub trigger: char,
    /// Offset from the caret to the command menu's top-left corner.
    pub menu_offset: Point,
    /// Gap between the inline menu and the selection: two 8px paddings plus
    /// a 4px gap.
    pub inline_menu_margin: f64,
    pub commands: CommandRegistry,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            trigger: '/',
            menu_offset: Point::new(8.0, 8.0),
            inline_menu_margin: 20.0,
            commands: CommandRegistry::default(),
        }
    }
}
