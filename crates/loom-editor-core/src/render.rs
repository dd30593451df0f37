//! Canonical markup rendering of a [`Document`].
//!
//! Every node carries its id as the `id` attribute so the next parse can
//! recover identity. Run marks render as `<strong>` and `<a href>` *inside*
//! the run's `<span>`, which keeps the span as the unit of identity.

use pulldown_cmark_escape::{FmtWriter, StrWrite, escape_html};

use crate::document::{ContentNode, Document, TextRun};

/// Render `doc` to a markup string suitable for `innerHTML`.
pub fn render_to_markup(doc: &Document) -> String {
    let mut out = String::new();
    // Writing into a String through fmt::Write cannot fail.
    let _ = render_into(FmtWriter(&mut out), doc);
    out
}

/// Render `doc` into any [`StrWrite`] sink.
pub fn render_into<W: StrWrite>(mut w: W, doc: &Document) -> Result<(), W::Error> {
    for node in doc.nodes() {
        match node {
            ContentNode::Paragraph { id, children } => {
                w.write_str("<p id=\"")?;
                escape_html(&mut w, id)?;
                w.write_str("\">")?;
                for run in children {
                    render_run(&mut w, run)?;
                }
                w.write_str("</p>")?;
            }
            ContentNode::Image { id, source } => {
                w.write_str("<img id=\"")?;
                escape_html(&mut w, id)?;
                w.write_str("\" src=\"")?;
                escape_html(&mut w, source)?;
                w.write_str("\" />")?;
            }
            ContentNode::Table { id } => {
                tracing::trace!(target: "loom::render", %id, "table has no markup, skipping");
            }
        }
    }
    Ok(())
}

fn render_run<W: StrWrite>(w: &mut W, run: &TextRun) -> Result<(), W::Error> {
    w.write_str("<span id=\"")?;
    escape_html(&mut *w, &run.id)?;
    w.write_str("\">")?;
    if run.marks.bold {
        w.write_str("<strong>")?;
    }
    if let Some(href) = &run.marks.link {
        w.write_str("<a href=\"")?;
        escape_html(&mut *w, href)?;
        w.write_str("\">")?;
    }
    escape_html(&mut *w, &run.value)?;
    if run.marks.link.is_some() {
        w.write_str("</a>")?;
    }
    if run.marks.bold {
        w.write_str("</strong>")?;
    }
    w.write_str("</span>")
}
