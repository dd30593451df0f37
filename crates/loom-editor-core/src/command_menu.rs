//! Slash-command menu state machine.
//!
//! The menu is either closed or open with a filter string and a selected
//! command key. Opening and filtering are driven by the reconciler's input
//! diff; keyboard navigation is driven by [`CommandMenu::handle_key`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::actions::{Key, KeyCombo};
use crate::document::{ContentNode, NodeId, NodeKind, TextRun};
use crate::ids::IdSource;
use crate::types::Point;

/// One insertable command: the node kind it creates and its display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub key: NodeKind,
    pub label: SmolStr,
}

impl CommandEntry {
    pub fn new(key: NodeKind, label: impl Into<SmolStr>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }
}

/// Ordered command table. Iteration order is the menu's display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(vec![
            CommandEntry::new(NodeKind::Paragraph, "Paragraph"),
            CommandEntry::new(NodeKind::Image, "Image"),
            CommandEntry::new(NodeKind::Table, "Table"),
        ])
    }
}

impl CommandRegistry {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn label(&self, key: NodeKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.label.as_str())
    }

    /// Entries whose key contains `filter` (case-sensitive, matched against
    /// the key, not the label).
    pub fn candidates<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a CommandEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.key.as_str().contains(filter))
    }
}

/// Trigger state of an open menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuQuery {
    /// Where to draw the menu, relative to the editor element.
    pub caret: Point,
    /// Text typed after the trigger.
    pub filter: String,
    /// Linear offset just past the trigger character.
    pub anchor: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct OpenMenu {
    query: MenuQuery,
    selected: Option<NodeKind>,
}

/// What [`CommandMenu::handle_key`] did with a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuKeyOutcome {
    /// The menu is closed or the key isn't one it handles.
    NotHandled,
    /// Selection moved (or stayed put with no candidates).
    Moved(Option<NodeKind>),
    /// Enter on a candidate; the menu is now closed.
    Chosen(NodeKind),
    /// Escape, or Enter with nothing selected; the menu is now closed.
    Dismissed,
}

impl MenuKeyOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotHandled)
    }
}

/// Render-ready snapshot of an open menu.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandMenuView {
    pub caret: Point,
    pub filter: String,
    pub selected: Option<NodeKind>,
    pub items: Vec<CommandEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct CommandMenu {
    registry: CommandRegistry,
    state: Option<OpenMenu>,
}

impl CommandMenu {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            state: None,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn query(&self) -> Option<&MenuQuery> {
        self.state.as_ref().map(|open| &open.query)
    }

    pub fn selected(&self) -> Option<NodeKind> {
        self.state.as_ref().and_then(|open| open.selected)
    }

    /// Open with an empty filter and the first command selected.
    pub fn open(&mut self, caret: Point, anchor: usize) {
        let selected = self.registry.candidates("").next().map(|entry| entry.key);
        tracing::debug!(target: "loom::menu", anchor, ?selected, "command menu opened");
        self.state = Some(OpenMenu {
            query: MenuQuery {
                caret,
                filter: String::new(),
                anchor,
            },
            selected,
        });
    }

    /// Replace the filter, resetting the selection to the first candidate if
    /// the selected key no longer matches.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let Some(open) = self.state.as_mut() else {
            return;
        };
        open.query.filter = filter.into();
        let still_matches = open
            .selected
            .is_some_and(|key| key.as_str().contains(open.query.filter.as_str()));
        if !still_matches {
            open.selected = self
                .registry
                .candidates(&open.query.filter)
                .next()
                .map(|entry| entry.key);
        }
        tracing::trace!(
            target: "loom::menu",
            filter = %open.query.filter,
            selected = ?open.selected,
            "command menu filtered"
        );
    }

    /// Close the menu. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.state.take().is_some();
        if was_open {
            tracing::debug!(target: "loom::menu", "command menu closed");
        }
        was_open
    }

    /// Current candidates in registry order; empty while closed.
    pub fn candidates(&self) -> Vec<&CommandEntry> {
        match &self.state {
            Some(open) => self.registry.candidates(&open.query.filter).collect(),
            None => Vec::new(),
        }
    }

    /// Handle a keydown while the menu may be open.
    ///
    /// Only unmodified ArrowUp/ArrowDown/Enter/Escape are consumed; every
    /// other key leaves the state untouched.
    pub fn handle_key(&mut self, combo: &KeyCombo) -> MenuKeyOutcome {
        if self.state.is_none() || !combo.modifiers.is_none() {
            return MenuKeyOutcome::NotHandled;
        }
        match combo.key {
            Key::ArrowDown => MenuKeyOutcome::Moved(self.step(Step::Next)),
            Key::ArrowUp => MenuKeyOutcome::Moved(self.step(Step::Previous)),
            Key::Enter => {
                let chosen = self.selected();
                self.close();
                match chosen {
                    Some(key) => MenuKeyOutcome::Chosen(key),
                    None => MenuKeyOutcome::Dismissed,
                }
            }
            Key::Escape => {
                self.close();
                MenuKeyOutcome::Dismissed
            }
            _ => MenuKeyOutcome::NotHandled,
        }
    }

    fn step(&mut self, step: Step) -> Option<NodeKind> {
        let open = self.state.as_mut()?;
        let keys: Vec<NodeKind> = self
            .registry
            .candidates(&open.query.filter)
            .map(|entry| entry.key)
            .collect();
        if keys.is_empty() {
            return None;
        }
        let current = open
            .selected
            .and_then(|key| keys.iter().position(|k| *k == key));
        let last = keys.len() - 1;
        let next = match (step, current) {
            (Step::Next, Some(i)) if i < last => i + 1,
            (Step::Next, _) => 0,
            (Step::Previous, Some(i)) if i > 0 => i - 1,
            (Step::Previous, _) => last,
        };
        open.selected = Some(keys[next]);
        open.selected
    }

    pub fn view(&self) -> Option<CommandMenuView> {
        let open = self.state.as_ref()?;
        Some(CommandMenuView {
            caret: open.query.caret,
            filter: open.query.filter.clone(),
            selected: open.selected,
            items: self.candidates().into_iter().cloned().collect(),
        })
    }
}

#[derive(Clone, Copy)]
enum Step {
    Next,
    Previous,
}

/// A fresh, empty top-level node of `kind`.
///
/// Paragraphs get one empty run so they are never childless. Text runs
/// cannot live at the top level, so `Text` also yields a paragraph.
pub fn blank_node<I: IdSource + ?Sized>(
    kind: NodeKind,
    ids: &mut I,
    taken: &HashSet<NodeId>,
) -> ContentNode {
    let id = ids.mint_unique(taken);
    match kind {
        NodeKind::Paragraph | NodeKind::Text => {
            let mut taken = taken.clone();
            taken.insert(id.clone());
            let run = TextRun::new(ids.mint_unique(&taken), "");
            ContentNode::Paragraph {
                id,
                children: vec![run],
            }
        }
        NodeKind::Image => ContentNode::Image {
            id,
            source: String::new(),
        },
        NodeKind::Table => ContentNode::Table { id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn open_menu() -> CommandMenu {
        let mut menu = CommandMenu::default();
        menu.open(Point::new(10.5, 20.5), 6);
        menu
    }

    fn keys(menu: &CommandMenu) -> Vec<NodeKind> {
        menu.candidates().iter().map(|entry| entry.key).collect()
    }

    #[test]
    fn test_open_selects_first_command() {
        let menu = open_menu();
        assert!(menu.is_open());
        assert_eq!(menu.selected(), Some(NodeKind::Paragraph));
        assert_eq!(
            keys(&menu),
            [NodeKind::Paragraph, NodeKind::Image, NodeKind::Table]
        );
    }

    #[test]
    fn test_filter_matches_key_substring() {
        let mut menu = open_menu();
        menu.set_filter("ta");
        assert_eq!(keys(&menu), [NodeKind::Table]);
        assert_eq!(menu.selected(), Some(NodeKind::Table));
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::Enter)),
            MenuKeyOutcome::Chosen(NodeKind::Table)
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_filter_is_case_sensitive_and_ignores_labels() {
        let mut menu = open_menu();
        menu.set_filter("Ta");
        assert!(keys(&menu).is_empty());
        assert_eq!(menu.selected(), None);

        // "a" matches paragraph, image and table; selection survives.
        menu.set_filter("");
        menu.handle_key(&KeyCombo::new(Key::ArrowDown));
        menu.set_filter("a");
        assert_eq!(menu.selected(), Some(NodeKind::Image));
    }

    #[test]
    fn test_arrow_keys_wrap() {
        let mut menu = open_menu();
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::ArrowUp)),
            MenuKeyOutcome::Moved(Some(NodeKind::Table))
        );
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::ArrowDown)),
            MenuKeyOutcome::Moved(Some(NodeKind::Paragraph))
        );
        menu.handle_key(&KeyCombo::new(Key::ArrowDown));
        assert_eq!(menu.selected(), Some(NodeKind::Image));
    }

    #[test]
    fn test_arrows_with_no_candidates() {
        let mut menu = open_menu();
        menu.set_filter("zzz");
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::ArrowDown)),
            MenuKeyOutcome::Moved(None)
        );
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::Enter)),
            MenuKeyOutcome::Dismissed
        );
        assert!(!menu.is_open());
    }

    #[test]
    fn test_escape_and_unhandled_keys() {
        let mut menu = open_menu();
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::character("x"))),
            MenuKeyOutcome::NotHandled
        );
        assert_eq!(
            menu.handle_key(&KeyCombo::ctrl(Key::Enter)),
            MenuKeyOutcome::NotHandled
        );
        assert!(menu.is_open());
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::Escape)),
            MenuKeyOutcome::Dismissed
        );
        assert_eq!(menu.query(), None);
        assert_eq!(
            menu.handle_key(&KeyCombo::new(Key::Escape)),
            MenuKeyOutcome::NotHandled
        );
    }

    #[test]
    fn test_view_snapshot() {
        let mut menu = open_menu();
        menu.set_filter("i");
        insta::assert_yaml_snapshot!(menu.view(), @r#"
        caret:
          x: 10.5
          y: 20.5
        filter: i
        selected: image
        items:
          - key: image
            label: Image
        "#);
    }

    #[test]
    fn test_blank_nodes() {
        let mut ids = SequentialIds::default();
        let taken: HashSet<NodeId> = ["n0"].into_iter().map(NodeId::from).collect();
        assert_eq!(
            blank_node(NodeKind::Paragraph, &mut ids, &taken),
            ContentNode::paragraph("n1", vec![TextRun::new("n2", "")])
        );
        assert_eq!(
            blank_node(NodeKind::Table, &mut ids, &taken),
            ContentNode::Table { id: "n3".into() }
        );
        assert_eq!(
            blank_node(NodeKind::Image, &mut ids, &taken),
            ContentNode::image("n4", "")
        );
    }
}
