//! Browser implementation of the caret tracker's platform reads.
//!
//! Uses the DOM Selection API. Linear offsets are char counts of the text
//! between the start of the editable element and a boundary point, measured
//! through a pre-caret `Range`'s `toString()`.

use loom_editor_core::{Rect, Selection, SurfaceError, SurfaceSelection};

/// `NodeFilter.SHOW_TEXT`.
const SHOW_TEXT: u32 = 0x4;

pub(crate) fn rect_from_dom(rect: &web_sys::DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Read the live selection, if it lies inside `root`.
pub fn read_selection(root: &web_sys::HtmlElement) -> Option<SurfaceSelection> {
    let window = web_sys::window()?;
    let selection = window.get_selection().ok()??;
    if selection.range_count() == 0 {
        return None;
    }
    let range = selection.get_range_at(0).ok()?;
    let end_container = range.end_container().ok()?;
    if !root.contains(Some(&end_container)) {
        return None;
    }

    let anchor = linear_offset(root, &selection.anchor_node()?, selection.anchor_offset())?;
    let head = linear_offset(root, &selection.focus_node()?, selection.focus_offset())?;

    let caret = range.clone_range();
    caret.collapse_with_to_start(true);
    let caret_rect = rect_from_dom(&caret.get_bounding_client_rect());
    let bounds = (!range.collapsed()).then(|| rect_from_dom(&range.get_bounding_client_rect()));

    tracing::trace!(target: "loom::cursor", anchor, head, "read selection");

    Some(SurfaceSelection {
        range: Selection::new(anchor, head),
        caret_rect: Some(caret_rect),
        bounds,
    })
}

/// Chars between the start of `root` and the boundary point `(node, offset)`.
pub fn linear_offset(
    root: &web_sys::HtmlElement,
    node: &web_sys::Node,
    offset: u32,
) -> Option<usize> {
    let document = root.owner_document()?;
    let pre_caret = document.create_range().ok()?;
    pre_caret.select_node_contents(root).ok()?;
    pre_caret.set_end(node, offset).ok()?;
    Some(String::from(pre_caret.to_string()).chars().count())
}

/// Collapse the selection to char `offset` within `root`.
pub fn restore_caret(root: &web_sys::HtmlElement, offset: usize) -> Result<(), SurfaceError> {
    let window = web_sys::window().ok_or("no window")?;
    let document = root.owner_document().ok_or("no document")?;
    let range = document
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;

    match find_text_node_at_offset(root, offset) {
        Ok((text_node, utf16_offset)) => range
            .set_start(&text_node, utf16_offset as u32)
            .map_err(|e| format!("set_start failed: {:?}", e))?,
        // An empty editor has no text nodes; the only caret spot is its start.
        Err(_) if offset == 0 => range
            .set_start(root, 0)
            .map_err(|e| format!("set_start failed: {:?}", e))?,
        Err(err) => return Err(err),
    }
    range.collapse_with_to_start(true);

    let selection = window
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or("no selection object")?;
    selection
        .remove_all_ranges()
        .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
    selection
        .add_range(&range)
        .map_err(|e| format!("add_range failed: {:?}", e))?;

    tracing::trace!(target: "loom::cursor", offset, "restored caret");
    Ok(())
}

/// Find the text node containing char `target` within `root`.
///
/// Returns the node and the UTF-16 offset inside it, since DOM ranges count
/// in UTF-16 units. An offset past the end lands at the end of the last
/// text node.
pub fn find_text_node_at_offset(
    root: &web_sys::HtmlElement,
    target: usize,
) -> Result<(web_sys::Node, usize), SurfaceError> {
    let document = root.owner_document().ok_or("no document")?;
    let walker = document
        .create_tree_walker_with_what_to_show(root, SHOW_TEXT)
        .map_err(|e| format!("create_tree_walker failed: {:?}", e))?;

    let mut accumulated = 0;
    let mut last: Option<(web_sys::Node, usize)> = None;

    while let Ok(Some(node)) = walker.next_node() {
        let Some(text) = node.text_content() else {
            continue;
        };
        let len = text.chars().count();

        if accumulated + len >= target {
            let utf16 = utf16_offset(&text, target - accumulated);
            return Ok((node, utf16));
        }

        accumulated += len;
        let end = text.encode_utf16().count();
        last = Some((node, end));
    }

    last.ok_or_else(|| "no text node found in container".into())
}

/// UTF-16 length of the first `chars` chars of `text`.
pub fn utf16_offset(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char::len_utf16).sum()
}
