//! Inline formatting over the content tree.
//!
//! Marks live on text runs, so formatting a range means splitting the runs
//! at its boundaries and setting marks on the pieces inside. The first piece
//! of a split run keeps the run's id; the others get fresh ones.

use std::collections::HashSet;

use crate::actions::FormatCommand;
use crate::document::{ContentNode, Document, Marks, NodeId, TextRun};
use crate::ids::IdSource;
use crate::types::Selection;

/// Apply `command` to the chars covered by `range`.
///
/// A collapsed range is a no-op. Offsets are document-wide, over the same
/// text as [`Document::text`].
pub fn apply_format<I: IdSource + ?Sized>(
    doc: &Document,
    range: Selection,
    command: &FormatCommand,
    ids: &mut I,
) -> Document {
    if range.is_collapsed() {
        return doc.clone();
    }
    let span = range.to_range();

    let bold = match command {
        FormatCommand::ToggleBold => Some(!all_bold(doc, span.clone())),
        FormatCommand::Link { .. } => None,
    };
    let apply = |marks: &mut Marks| match command {
        FormatCommand::ToggleBold => marks.bold = bold.unwrap_or(true),
        FormatCommand::Link { href } => marks.link = Some(href.clone()),
    };

    let mut taken = doc.id_set();
    let mut offset = 0;
    let nodes = doc
        .nodes()
        .iter()
        .map(|node| match node {
            ContentNode::Paragraph { id, children } => {
                let mut runs = Vec::with_capacity(children.len());
                for run in children {
                    let run_start = offset;
                    let run_len = run.char_len();
                    offset += run_len;

                    let from = span.start.clamp(run_start, run_start + run_len) - run_start;
                    let to = span.end.clamp(run_start, run_start + run_len) - run_start;
                    if from == to {
                        runs.push(run.clone());
                        continue;
                    }

                    let pieces = [(0, from, false), (from, to, true), (to, run_len, false)];
                    let mut first = true;
                    for (start, end, inside) in pieces {
                        if start == end {
                            continue;
                        }
                        let run_id = if first {
                            run.id.clone()
                        } else {
                            fresh_id(ids, &mut taken)
                        };
                        first = false;
                        let mut marks = run.marks.clone();
                        if inside {
                            apply(&mut marks);
                        }
                        let value = char_slice(&run.value, start, end);
                        runs.push(TextRun::new(run_id, value).with_marks(marks));
                    }
                }
                ContentNode::Paragraph {
                    id: id.clone(),
                    children: runs,
                }
            }
            other => other.clone(),
        })
        .collect();

    tracing::debug!(
        target: "loom::format",
        ?command,
        start = span.start,
        end = span.end,
        "applied format"
    );
    Document::new(nodes)
}

/// Whether every run overlapping `span` is already bold.
fn all_bold(doc: &Document, span: std::ops::Range<usize>) -> bool {
    let mut offset = 0;
    let mut any = false;
    for run in doc.nodes().iter().flat_map(ContentNode::runs) {
        let start = offset;
        offset += run.char_len();
        if start < span.end && span.start < offset {
            any = true;
            if !run.marks.bold {
                return false;
            }
        }
    }
    any
}

fn fresh_id<I: IdSource + ?Sized>(ids: &mut I, taken: &mut HashSet<NodeId>) -> NodeId {
    let id = ids.mint_unique(taken);
    taken.insert(id.clone());
    id
}

fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::render::render_to_markup;

    fn doc() -> Document {
        Document::new(vec![
            ContentNode::image("0", "a.png"),
            ContentNode::paragraph(
                "1",
                vec![TextRun::new("11", "Hello "), TextRun::new("12", "World!")],
            ),
        ])
    }

    #[test]
    fn test_bold_splits_run() {
        let out = apply_format(
            &doc(),
            Selection::new(1, 4),
            &FormatCommand::ToggleBold,
            &mut SequentialIds::default(),
        );
        insta::assert_snapshot!(
            render_to_markup(&out),
            @r#"<img id="0" src="a.png" /><p id="1"><span id="11">H</span><span id="n0"><strong>ell</strong></span><span id="n1">o </span><span id="12">World!</span></p>"#
        );
        assert_eq!(out.text(), doc().text());
    }

    #[test]
    fn test_range_across_runs() {
        let out = apply_format(
            &doc(),
            Selection::new(8, 3),
            &FormatCommand::Link {
                href: "https://x.test".into(),
            },
            &mut SequentialIds::default(),
        );
        let runs = out.nodes()[1].runs();
        let shape: Vec<(&str, &str, bool)> = runs
            .iter()
            .map(|r| (r.id.as_str(), r.value.as_str(), r.marks.link.is_some()))
            .collect();
        assert_eq!(
            shape,
            [
                ("11", "Hel", false),
                ("n0", "lo ", true),
                ("12", "Wo", true),
                ("n1", "rld!", false),
            ]
        );
    }

    #[test]
    fn test_bold_toggles_off_when_fully_bold() {
        let mut ids = SequentialIds::default();
        let bold = FormatCommand::ToggleBold;
        let once = apply_format(&doc(), Selection::new(0, 6), &bold, &mut ids);
        assert!(once.nodes()[1].runs()[0].marks.bold);
        assert_eq!(once.nodes()[1].runs().len(), 2);

        let twice = apply_format(&once, Selection::new(0, 6), &bold, &mut ids);
        assert_eq!(twice, doc());
    }

    #[test]
    fn test_partially_bold_range_becomes_bold() {
        let mut ids = SequentialIds::default();
        let toggle = FormatCommand::ToggleBold;
        let once = apply_format(&doc(), Selection::new(0, 3), &toggle, &mut ids);
        let twice = apply_format(&once, Selection::new(0, 8), &toggle, &mut ids);
        let bold: String = twice.nodes()[1]
            .runs()
            .iter()
            .filter(|r| r.marks.bold)
            .map(|r| r.value.as_str())
            .collect();
        assert_eq!(bold, "Hello Wo");
    }

    #[test]
    fn test_collapsed_range_is_noop() {
        let out = apply_format(
            &doc(),
            Selection::collapsed(3),
            &FormatCommand::ToggleBold,
            &mut SequentialIds::default(),
        );
        assert_eq!(out, doc());
    }
}
