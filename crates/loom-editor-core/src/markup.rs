//! Structured view of surface markup.
//!
//! The browser layer builds a [`MarkupNode`] tree by walking the live DOM; the
//! in-memory surface and the tests build one from a string with
//! [`parse_fragment`]. Either way the tree parser in [`crate::parse`] only
//! ever sees this shape.
//!
//! `parse_fragment` is deliberately lenient: it never fails. Unclosed tags are
//! closed at the end of input, stray end tags are ignored, comments are
//! dropped and only a handful of entities are decoded.

use smol_str::SmolStr;

/// A node of surface markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

impl MarkupNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&MarkupElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants (`textContent`).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<MarkupElement> for MarkupNode {
    fn from(el: MarkupElement) -> Self {
        Self::Element(el)
    }
}

/// An element with a lowercase tag name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupElement {
    pub tag: SmolStr,
    pub attrs: Vec<(SmolStr, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: SmolStr::new(tag.as_ref().to_ascii_lowercase()),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.attrs
            .push((SmolStr::new(name.as_ref().to_ascii_lowercase()), value.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// First value of attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `id` attribute, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(MarkupNode::text_content).collect()
    }
}

/// Elements that never have children or an end tag.
const VOID_TAGS: &[&str] = &["area", "br", "col", "embed", "hr", "img", "input", "meta", "wbr"];

/// Parse a markup fragment (an `innerHTML` value) into a node list.
pub fn parse_fragment(input: &str) -> Vec<MarkupNode> {
    let mut builder = TreeBuilder::default();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            builder.close(&after[..end].trim().to_ascii_lowercase());
            rest = after.get(end + 1..).unwrap_or("");
        } else if starts_tag(rest) {
            let (tag, consumed) = parse_start_tag(rest);
            builder.open(tag);
            rest = &rest[consumed..];
        } else {
            // A '<' that doesn't open a tag is literal text.
            let skip = usize::from(rest.starts_with('<'));
            let end = rest[skip..]
                .find('<')
                .map(|pos| pos + skip)
                .unwrap_or(rest.len());
            builder.text(decode_entities(&rest[..end]));
            rest = &rest[end..];
        }
    }

    builder.finish()
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

struct StartTag {
    element: MarkupElement,
    self_closing: bool,
}

/// Parse `<name attr="value" ...>` at the start of `src`.
///
/// Returns the tag and the number of bytes consumed. Every delimiter is
/// ASCII, so slicing at their positions always lands on a char boundary.
fn parse_start_tag(src: &str) -> (StartTag, usize) {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut i = 1;

    let name_start = i;
    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    let mut element = MarkupElement::new(&src[name_start..i]);
    let mut self_closing = false;

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = &src[attr_start..i];

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                value = decode_entities(&src[value_start..i]);
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = decode_entities(&src[value_start..i]);
            }
        }

        if !name.is_empty() {
            element = element.with_attr(name, value);
        }
    }

    (
        StartTag {
            element,
            self_closing,
        },
        i,
    )
}

/// Decode the entities our renderer (and browsers' `innerHTML`) emit.
///
/// Unknown entities are left as written.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<MarkupNode>,
    open: Vec<MarkupElement>,
}

impl TreeBuilder {
    fn append(&mut self, node: MarkupNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, tag: StartTag) {
        if tag.self_closing || VOID_TAGS.contains(&tag.element.tag.as_str()) {
            self.append(MarkupNode::Element(tag.element));
        } else {
            self.open.push(tag.element);
        }
    }

    /// Close the innermost open `name`, and everything opened inside it.
    fn close(&mut self, name: &str) {
        let Some(pos) = self.open.iter().rposition(|el| el.tag == name) else {
            return;
        };
        while self.open.len() > pos {
            if let Some(el) = self.open.pop() {
                self.append(MarkupNode::Element(el));
            }
        }
    }

    fn text(&mut self, text: String) {
        if !text.is_empty() {
            self.append(MarkupNode::Text(text));
        }
    }

    fn finish(mut self) -> Vec<MarkupNode> {
        while let Some(el) = self.open.pop() {
            self.append(MarkupNode::Element(el));
        }
        self.roots
    }
}
