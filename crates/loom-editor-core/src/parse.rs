//! Rebuild a [`Document`] from surface markup.
//!
//! The parse is total: whatever the surface contains, the result is a valid
//! document. Recognised elements keep their `id` attribute; elements that
//! arrive without one, or with an id already claimed earlier in pre-order,
//! get a fresh id from the [`IdSource`]. Fresh ids never match any id present
//! anywhere in the markup, so minting cannot re-key a later node.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::document::{ContentNode, Document, Marks, NodeId, TextRun};
use crate::ids::IdSource;
use crate::markup::{MarkupElement, MarkupNode};

/// Parse the editable region's children into a document.
pub fn parse_markup<I: IdSource + ?Sized>(nodes: &[MarkupNode], ids: &mut I) -> Document {
    let mut reserved = HashSet::new();
    collect_ids(nodes, &mut reserved);
    let mut ledger = IdLedger {
        seen: HashSet::new(),
        reserved,
        ids,
    };
    let mut out = Vec::new();

    for node in nodes {
        match node {
            MarkupNode::Element(el) if el.is("p") => out.push(parse_paragraph(el, &mut ledger)),
            MarkupNode::Element(el) if el.is("img") => {
                let id = ledger.claim(el.id());
                let source = el.attr("src").unwrap_or_default().to_string();
                out.push(ContentNode::Image { id, source });
            }
            MarkupNode::Element(el) => {
                tracing::trace!(
                    target: "loom::parse",
                    tag = %el.tag,
                    "dropping unrecognised element"
                );
            }
            MarkupNode::Text(text) if text.trim().is_empty() => {}
            MarkupNode::Text(text) => {
                // Typing into an emptied editor lands text directly in the root.
                let id = ledger.claim(None);
                let run = TextRun::new(ledger.claim(None), text.clone());
                out.push(ContentNode::paragraph(id, vec![run]));
            }
        }
    }

    Document::new(out)
}

fn parse_paragraph<I: IdSource + ?Sized>(
    el: &MarkupElement,
    ledger: &mut IdLedger<'_, I>,
) -> ContentNode {
    let id = ledger.claim(el.id());
    let mut children = Vec::new();

    for child in &el.children {
        match child {
            MarkupNode::Element(span) if span.is("span") => {
                let run_id = ledger.claim(span.id());
                let mut marks = Marks::default();
                collect_marks(&span.children, &mut marks);
                children.push(TextRun::new(run_id, span.text_content()).with_marks(marks));
            }
            MarkupNode::Element(inline) if is_mark(inline) => {
                let mut marks = Marks::default();
                collect_marks(std::slice::from_ref(child), &mut marks);
                children.push(
                    TextRun::new(ledger.claim(None), inline.text_content()).with_marks(marks),
                );
            }
            MarkupNode::Element(other) => {
                tracing::trace!(
                    target: "loom::parse",
                    tag = %other.tag,
                    "dropping element inside paragraph"
                );
            }
            MarkupNode::Text(text) => {
                children.push(TextRun::new(ledger.claim(None), text.clone()));
            }
        }
    }

    if children.is_empty() {
        children.push(TextRun::new(ledger.claim(None), ""));
    }

    ContentNode::Paragraph { id, children }
}

fn is_mark(el: &MarkupElement) -> bool {
    el.is("strong") || el.is("b") || el.is("a")
}

fn collect_marks(nodes: &[MarkupNode], marks: &mut Marks) {
    for node in nodes {
        let MarkupNode::Element(el) = node else {
            continue;
        };
        if el.is("strong") || el.is("b") {
            marks.bold = true;
        }
        if el.is("a") && marks.link.is_none() {
            marks.link = el.attr("href").map(SmolStr::new);
        }
        collect_marks(&el.children, marks);
    }
}

/// Every explicit id in `nodes`, at any depth.
fn collect_ids(nodes: &[MarkupNode], out: &mut HashSet<NodeId>) {
    for node in nodes {
        if let MarkupNode::Element(el) = node {
            if let Some(id) = el.id() {
                out.insert(NodeId::new(id));
            }
            collect_ids(&el.children, out);
        }
    }
}

/// Hands out ids, keeping the first claimant of a duplicated id.
struct IdLedger<'a, I: IdSource + ?Sized> {
    /// Ids already given to a node in this pass.
    seen: HashSet<NodeId>,
    /// Ids minting must avoid: every explicit id plus every minted one.
    reserved: HashSet<NodeId>,
    ids: &'a mut I,
}

impl<I: IdSource + ?Sized> IdLedger<'_, I> {
    fn claim(&mut self, existing: Option<&str>) -> NodeId {
        let id = match existing {
            Some(id) if !self.seen.contains(id) => NodeId::new(id),
            Some(id) => {
                let fresh = self.mint();
                tracing::debug!(
                    target: "loom::parse",
                    duplicate = id,
                    %fresh,
                    "re-keyed duplicate id"
                );
                fresh
            }
            None => self.mint(),
        };
        self.seen.insert(id.clone());
        id
    }

    fn mint(&mut self) -> NodeId {
        let fresh = self.ids.mint_unique(&self.reserved);
        self.reserved.insert(fresh.clone());
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::markup::parse_fragment;
    use crate::render::render_to_markup;

    fn parse(html: &str) -> Document {
        parse_markup(&parse_fragment(html), &mut SequentialIds::default())
    }

    #[test]
    fn test_round_trip_preserves_ids() {
        let doc = Document::new(vec![
            ContentNode::image("0", "https://picsum.photos/200/300"),
            ContentNode::paragraph(
                "1",
                vec![
                    TextRun::new("11", "Hello "),
                    TextRun::new("12", "World!").with_marks(Marks {
                        bold: true,
                        link: Some("https://w.test".into()),
                    }),
                ],
            ),
        ]);
        assert_eq!(parse(&render_to_markup(&doc)), doc);
    }

    #[test]
    fn test_typed_text_lands_in_existing_span() {
        let doc = parse(r#"<p id="1"><span id="11">Hello/</span></p>"#);
        assert_eq!(
            doc,
            Document::new(vec![ContentNode::paragraph(
                "1",
                vec![TextRun::new("11", "Hello/")]
            )])
        );
    }

    #[test]
    fn test_missing_ids_are_minted() {
        let doc = parse("<p><span>a</span>b</p>");
        assert_eq!(
            doc,
            Document::new(vec![ContentNode::paragraph(
                "n0",
                vec![TextRun::new("n1", "a"), TextRun::new("n2", "b")]
            )])
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first_claimant() {
        // Pressing Enter duplicates the paragraph and span the caret was in.
        let doc = parse(
            r#"<p id="1"><span id="11">Hello</span></p><p id="1"><span id="11">World</span></p>"#,
        );
        let ids: Vec<&str> = doc.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["1", "11", "n0", "n1"]);
        assert_eq!(doc.nodes()[1].text(), "World");
    }

    #[test]
    fn test_minted_ids_skip_claimed_ones() {
        let doc = parse(r#"<p id="n0"><span>x</span></p>"#);
        let ids: Vec<&str> = doc.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["n0", "n1"]);
    }

    #[test]
    fn test_minted_ids_skip_ids_claimed_later() {
        // A new paragraph typed above existing counter-style ids.
        let doc = parse(r#"<p><span>new</span></p><p id="n0"><span id="n1">kept</span></p>"#);
        let ids: Vec<&str> = doc.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["n2", "n3", "n0", "n1"]);
        assert_eq!(doc.find("n0").map(ContentNode::text).as_deref(), Some("kept"));
    }

    #[test]
    fn test_duplicate_rekey_skips_ids_claimed_later() {
        let doc = parse(
            r#"<p id="a"><span id="b">x</span></p><p id="a"><span id="b">y</span></p><p id="n0"><span id="n1">z</span></p>"#,
        );
        let ids: Vec<&str> = doc.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "n2", "n3", "n0", "n1"]);
    }

    #[test]
    fn test_empty_paragraph_gets_empty_run() {
        let doc = parse(r#"<p id="1"><br></p>"#);
        assert_eq!(
            doc,
            Document::new(vec![ContentNode::paragraph("1", vec![TextRun::new("n0", "")])])
        );
    }

    #[test]
    fn test_stray_text_is_wrapped() {
        let doc = parse("  <div>junk</div>typed");
        assert_eq!(
            doc,
            Document::new(vec![ContentNode::paragraph(
                "n0",
                vec![TextRun::new("n1", "typed")]
            )])
        );
    }

    #[test]
    fn test_bare_inline_marks() {
        let doc = parse(r#"<p id="p"><b>x</b><a href="/y">y</a></p>"#);
        let runs = doc.nodes()[0].runs();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].marks.bold);
        assert_eq!(runs[1].marks.link.as_deref(), Some("/y"));
    }

    #[test]
    fn test_image_without_src() {
        let doc = parse(r#"<img id="i">"#);
        assert_eq!(doc, Document::new(vec![ContentNode::image("i", "")]));
    }
}
