//! DOM to markup-tree synchronization.
//!
//! Walks the live children of the editable element into the core's
//! [`MarkupNode`] tree. Only the attributes the parser looks at are copied.

use loom_editor_core::{MarkupElement, MarkupNode};
use wasm_bindgen::JsCast;

/// Attributes carried over from DOM elements.
const KEPT_ATTRIBUTES: &[&str] = &["id", "src", "href"];

/// Snapshot the children of `root`.
pub fn markup_from_children(root: &web_sys::Element) -> Vec<MarkupNode> {
    let children = root.child_nodes();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter_map(|node| node_to_markup(&node))
        .collect()
}

/// Convert one DOM node. Comments and other non-content nodes yield `None`.
pub fn node_to_markup(node: &web_sys::Node) -> Option<MarkupNode> {
    match node.node_type() {
        web_sys::Node::TEXT_NODE => {
            Some(MarkupNode::Text(node.text_content().unwrap_or_default()))
        }
        web_sys::Node::ELEMENT_NODE => {
            let element = node.dyn_ref::<web_sys::Element>()?;
            Some(MarkupNode::Element(element_to_markup(element)))
        }
        other => {
            tracing::trace!(
                target: "loom::dom_sync",
                node_type = other,
                "skipping non-content node"
            );
            None
        }
    }
}

fn element_to_markup(element: &web_sys::Element) -> MarkupElement {
    let mut out = MarkupElement::new(element.tag_name());
    for name in KEPT_ATTRIBUTES {
        if let Some(value) = element.get_attribute(name) {
            out = out.with_attr(name, value);
        }
    }
    out.children = markup_from_children(element);
    out
}
