//! End-to-end editing sessions against the in-memory surface.

use loom_editor_core::{
    ContentNode, Document, DocumentHost, Editor, EditorConfig, FakeSurface, FormatCommand, Key,
    KeyCombo, KeydownResult, MenuSignal, NodeKind, OwnedDocument, Rect, SequentialIds, Selection,
    SurfaceSelection, TextRun, parse_fragment, parse_markup, render_to_markup,
};

fn seed() -> Document {
    Document::new(vec![
        ContentNode::image("0", "https://picsum.photos/200/300"),
        ContentNode::paragraph(
            "1",
            vec![TextRun::new("11", "Hello "), TextRun::new("12", "World!")],
        ),
    ])
}

fn editor() -> (Editor<FakeSurface>, OwnedDocument) {
    let host = OwnedDocument::new(seed());
    let surface = FakeSurface::new()
        .with_bounds(Rect::new(40.0, 100.0, 640.0, 480.0))
        .with_selection(
            SurfaceSelection::caret(12).with_caret_rect(Rect::new(140.0, 120.0, 0.0, 18.0)),
        );
    let mut editor = Editor::new(surface, EditorConfig::default(), SequentialIds::default());
    editor.mount(&host).unwrap();
    (editor, host)
}

fn press(editor: &mut Editor<FakeSurface>, host: &mut OwnedDocument, key: Key) -> KeydownResult {
    editor.handle_key(&KeyCombo::new(key), host).unwrap()
}

#[test]
fn slash_filter_and_insert_table() {
    let (mut editor, mut host) = editor();

    editor.surface_mut().edit(
        r#"<img id="0" src="https://picsum.photos/200/300" /><p id="1"><span id="11">Hello </span><span id="12">World!/</span></p>"#,
        13,
    );
    let rec = editor.handle_input(&mut host).unwrap();
    assert_eq!(
        rec.menu,
        MenuSignal::Open {
            caret: loom_editor_core::Point::new(108.0, 28.0),
            anchor: 13,
        }
    );
    assert_eq!(editor.surface().listener_count(), 1);

    for (typed, caret) in [("World!/t", 14), ("World!/ta", 15)] {
        editor.surface_mut().edit(
            &format!(
                r#"<img id="0" src="https://picsum.photos/200/300" /><p id="1"><span id="11">Hello </span><span id="12">{typed}</span></p>"#
            ),
            caret,
        );
        editor.handle_input(&mut host).unwrap();
    }

    let view = editor.menu_view().unwrap();
    assert_eq!(view.filter, "ta");
    assert_eq!(view.selected, Some(NodeKind::Table));
    assert_eq!(view.items.len(), 1);

    assert_eq!(press(&mut editor, &mut host, Key::Enter), KeydownResult::Handled);
    let doc = host.current();
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.nodes()[2].kind(), NodeKind::Table);
    assert!(editor.menu_view().is_none());
    assert_eq!(editor.surface().listener_count(), 0);
    // Tables have no markup yet.
    assert!(!editor.surface().html().contains("table"));
}

#[test]
fn arrow_navigation_wraps() {
    let (mut editor, mut host) = editor();
    editor.surface_mut().edit(
        r#"<p id="1"><span id="11">Hello </span><span id="12">World!/</span></p>"#,
        13,
    );
    editor.handle_input(&mut host).unwrap();
    assert_eq!(host.current().len(), 1, "the image was deleted in the same edit");
    assert_eq!(editor.menu().selected(), Some(NodeKind::Paragraph));

    press(&mut editor, &mut host, Key::ArrowUp);
    assert_eq!(editor.menu().selected(), Some(NodeKind::Table));
    press(&mut editor, &mut host, Key::ArrowDown);
    assert_eq!(editor.menu().selected(), Some(NodeKind::Paragraph));

    assert_eq!(
        press(&mut editor, &mut host, Key::character("q")),
        KeydownResult::NotHandled
    );
    assert!(editor.menu().is_open());
}

#[test]
fn enter_split_paragraph_gets_fresh_ids() {
    let (mut editor, mut host) = editor();
    // The browser clones the paragraph and span the caret was in.
    editor.surface_mut().edit(
        r#"<img id="0" src="https://picsum.photos/200/300" /><p id="1"><span id="11">Hello </span></p><p id="1"><span id="11">World!</span></p>"#,
        6,
    );
    editor.handle_input(&mut host).unwrap();

    let doc = host.current();
    let ids: Vec<&str> = doc.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, ["0", "1", "11", "n0", "n1"]);
    assert_eq!(
        editor.surface().html(),
        render_to_markup(doc),
        "surface is rewritten canonically"
    );
}

#[test]
fn inline_menu_follows_selection() {
    let (mut editor, mut host) = editor();
    editor.set_inline_menu_height(32.0);
    assert_eq!(editor.inline_menu(), None);

    editor.surface_mut().set_selection(Some(SurfaceSelection {
        range: Selection::new(0, 5),
        caret_rect: None,
        bounds: Some(Rect::new(60.0, 300.0, 50.0, 18.0)),
    }));
    let pos = editor.inline_menu().unwrap();
    assert_eq!(pos.left, 20.0);
    assert_eq!(pos.top, 300.0 - 100.0 - 18.0 - 32.0 - 20.0);

    editor
        .apply_format(
            &FormatCommand::Link {
                href: "https://loom.test".into(),
            },
            &mut host,
        )
        .unwrap();
    let markup = editor.surface().html().to_string();
    assert!(markup.contains(r#"<span id="11"><a href="https://loom.test">Hello</a></span>"#));

    // The next keystroke re-derives the same marks from the surface.
    let reparsed = parse_markup(&parse_fragment(&markup), &mut SequentialIds::new("x"));
    assert_eq!(&reparsed, host.current());
}
