//! WASM browser tests for loom-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use loom_editor_browser::{
    BrowserSurface, Document, DocumentHost, Editor, EditorConfig, EditorError, InputSurface, Key,
    MarkupNode, OwnedDocument, SequentialIds, parse_browser_key,
};
use loom_editor_core::{ContentNode, Marks, TextRun, render_to_markup};

fn editable(html: &str) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    element.set_attribute("contenteditable", "true").unwrap();
    element.set_inner_html(html);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn sample() -> Document {
    Document::new(vec![
        ContentNode::paragraph(
            "p1",
            vec![
                TextRun::new("r1", "Hello "),
                TextRun::new("r2", "world").with_marks(Marks {
                    bold: true,
                    link: None,
                }),
            ],
        ),
        ContentNode::image("img1", "cat.png"),
    ])
}

// === Key parsing ===

#[wasm_bindgen_test]
fn parse_named_keys() {
    assert_eq!(parse_browser_key("ArrowDown"), Key::ArrowDown);
    assert_eq!(parse_browser_key("ArrowUp"), Key::ArrowUp);
    assert_eq!(parse_browser_key("Enter"), Key::Enter);
    assert_eq!(parse_browser_key("Escape"), Key::Escape);
    assert_eq!(parse_browser_key("Esc"), Key::Escape);
}

#[wasm_bindgen_test]
fn parse_printable_and_unknown_keys() {
    assert_eq!(parse_browser_key("/"), Key::Character("/".into()));
    assert_eq!(parse_browser_key(" "), Key::Space);
    assert_eq!(parse_browser_key("F13"), Key::Unidentified);
    assert_eq!(parse_browser_key(""), Key::Unidentified);
}

// === Surface ===

#[wasm_bindgen_test]
fn surface_reads_rendered_markup() {
    let element = editable(&render_to_markup(&sample()));
    let surface = BrowserSurface::new(element.clone());

    assert!(surface.is_mounted());
    assert_eq!(surface.plain_text(), "Hello world");

    let markup = surface.read_markup().unwrap();
    assert_eq!(markup.len(), 2);
    let MarkupNode::Element(paragraph) = &markup[0] else {
        panic!("expected element, got {:?}", markup[0]);
    };
    assert_eq!(paragraph.id(), Some("p1"));
    let MarkupNode::Element(image) = &markup[1] else {
        panic!("expected element, got {:?}", markup[1]);
    };
    assert_eq!(image.attr("src"), Some("cat.png"));

    element.remove();
}

#[wasm_bindgen_test]
fn surface_restores_caret_by_char_offset() {
    let element = editable("<p id=\"p\"><span id=\"a\">ab</span><span id=\"b\">cd</span></p>");
    let mut surface = BrowserSurface::new(element.clone());

    surface.restore_caret(3).unwrap();
    let selection = surface.selection().expect("selection inside editor");
    assert_eq!(selection.caret_offset(), 3);
    assert!(selection.is_collapsed());

    element.remove();
}

#[wasm_bindgen_test]
fn caret_rect_sits_at_selection_start() {
    let element = editable("<p id=\"p\"><span id=\"a\">Hello world</span></p>");
    let surface = BrowserSurface::new(element.clone());

    let text = element.query_selector("#a").unwrap().unwrap().first_child().unwrap();
    let selection = web_sys::window().unwrap().get_selection().unwrap().unwrap();
    selection.set_base_and_extent(&text, 6, &text, 11).unwrap();

    let read = surface.selection().expect("selection inside editor");
    assert_eq!(read.range.start(), 6);
    let caret = read.caret_rect.expect("caret rect");
    let bounds = read.bounds.expect("selection bounds");
    assert!((caret.left - bounds.left).abs() < 1.0);
    assert!(bounds.width > 1.0);

    element.remove();
}

#[wasm_bindgen_test]
fn surface_rejects_caret_in_empty_editor_past_start() {
    let element = editable("");
    let mut surface = BrowserSurface::new(element.clone());

    assert!(surface.restore_caret(0).is_ok());
    assert!(surface.restore_caret(2).is_err());

    element.remove();
}

#[wasm_bindgen_test]
fn detached_element_is_not_mounted() {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    let surface = BrowserSurface::new(element);
    assert!(!surface.is_mounted());

    let mut editor = Editor::new(surface, EditorConfig::default(), SequentialIds::default());
    let host = OwnedDocument::new(sample());
    assert!(matches!(editor.mount(&host), Err(EditorError::NotMounted)));
}

// === Editor over the DOM ===

#[wasm_bindgen_test]
fn typed_text_reconciles_into_document() {
    let element = editable("");
    let surface = BrowserSurface::new(element.clone());
    let mut editor = Editor::new(surface, EditorConfig::default(), SequentialIds::default());
    let mut host = OwnedDocument::new(sample());
    editor.mount(&host).unwrap();

    // Simulate the browser appending a character to the bold run.
    let bold = element.query_selector("strong").unwrap().unwrap();
    bold.set_text_content(Some("world!"));
    editor.surface_mut().restore_caret(12).unwrap();

    let rec = editor.handle_input(&mut host).unwrap();
    assert_eq!(rec.length_delta, 1);
    assert_eq!(host.current().text(), "Hello world!");
    assert_eq!(host.current().nodes().len(), 2);
    assert!(!editor.is_listening());

    element.remove();
}

#[wasm_bindgen_test]
fn slash_opens_menu_and_holds_keydown_listener() {
    let element = editable("");
    let surface = BrowserSurface::new(element.clone());
    let mut editor = Editor::new(surface, EditorConfig::default(), SequentialIds::default());
    let mut host = OwnedDocument::new(sample());
    editor.mount(&host).unwrap();

    let first_run = element.query_selector("#r1").unwrap().unwrap();
    first_run.set_text_content(Some("Hello /"));
    editor.surface_mut().restore_caret(7).unwrap();

    editor.handle_input(&mut host).unwrap();
    assert!(editor.menu().is_open());
    assert!(editor.is_listening());

    editor.unmount();
    assert!(!editor.is_listening());

    element.remove();
}
