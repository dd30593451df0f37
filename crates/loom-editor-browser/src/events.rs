//! Browser event translation.
//!
//! Converts `KeyboardEvent`s into the core's platform-agnostic key types.

use loom_editor_core::{Key, KeyCombo, Modifiers};
use smol_str::SmolStr;

/// Parse a `KeyboardEvent.key` value.
pub fn parse_browser_key(key: &str) -> Key {
    match key {
        "Backspace" => Key::Backspace,
        "Delete" => Key::Delete,
        "Enter" => Key::Enter,
        "Tab" => Key::Tab,
        "Escape" | "Esc" => Key::Escape,
        " " => Key::Space,
        "ArrowLeft" => Key::ArrowLeft,
        "ArrowRight" => Key::ArrowRight,
        "ArrowUp" => Key::ArrowUp,
        "ArrowDown" => Key::ArrowDown,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Alt" => Key::Alt,
        "Control" => Key::Control,
        "Meta" => Key::Meta,
        "Shift" => Key::Shift,
        "" | "Unidentified" => Key::Unidentified,
        // Printable keys are a single grapheme; everything else is a named
        // key we don't distinguish.
        other if other.chars().count() == 1 => Key::Character(SmolStr::new(other)),
        _ => Key::Unidentified,
    }
}

/// Key and modifier state of a keydown event.
pub fn key_combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        parse_browser_key(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}
