//! Content tree model: documents, nodes and text runs.
//!
//! A [`Document`] is an ordered list of top-level [`ContentNode`]s. Paragraphs
//! own their [`TextRun`]s directly, so a text run can only ever appear nested
//! under a paragraph. Documents are values: every edit produces a new
//! `Document` which the owning [`DocumentHost`] swaps in wholesale.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Node identifier, unique within a document.
pub type NodeId = SmolStr;

/// Kind tag of a content node.
///
/// The lowercase name doubles as the command key used by the slash menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Paragraph,
    Text,
    Image,
    /// Reserved. Insertable, but never rendered.
    Table,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Image => "image",
            Self::Table => "table",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "paragraph" => Some(Self::Paragraph),
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline formatting carried by a text run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<SmolStr>,
}

impl Marks {
    pub fn is_plain(&self) -> bool {
        !self.bold && self.link.is_none()
    }
}

/// A run of text inside a paragraph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub id: NodeId,
    pub value: String,
    #[serde(default, skip_serializing_if = "Marks::is_plain")]
    pub marks: Marks,
}

impl TextRun {
    pub fn new(id: impl Into<NodeId>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            marks: Marks::default(),
        }
    }

    pub fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = marks;
        self
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// A top-level node of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    Paragraph { id: NodeId, children: Vec<TextRun> },
    Image { id: NodeId, source: String },
    Table { id: NodeId },
}

impl ContentNode {
    pub fn paragraph(id: impl Into<NodeId>, children: Vec<TextRun>) -> Self {
        Self::Paragraph {
            id: id.into(),
            children,
        }
    }

    pub fn image(id: impl Into<NodeId>, source: impl Into<String>) -> Self {
        Self::Image {
            id: id.into(),
            source: source.into(),
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Self::Paragraph { id, .. } | Self::Image { id, .. } | Self::Table { id } => id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Paragraph { .. } => NodeKind::Paragraph,
            Self::Image { .. } => NodeKind::Image,
            Self::Table { .. } => NodeKind::Table,
        }
    }

    /// Text runs of a paragraph; empty for every other kind.
    pub fn runs(&self) -> &[TextRun] {
        match self {
            Self::Paragraph { children, .. } => children,
            _ => &[],
        }
    }

    /// Rendered text: the concatenation of the run values in order.
    pub fn text(&self) -> String {
        self.runs().iter().map(|run| run.value.as_str()).collect()
    }
}

/// An ordered sequence of top-level content nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    nodes: Vec<ContentNode>,
}

impl Document {
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<ContentNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenation of every text run in document order.
    ///
    /// This is the quantity the reconciler diffs against the surface text.
    pub fn text(&self) -> String {
        self.nodes.iter().map(ContentNode::text).collect()
    }

    /// Every node id in pre-order: a paragraph before its runs.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().flat_map(|node| {
            std::iter::once(node.id()).chain(node.runs().iter().map(|run| &run.id))
        })
    }

    pub fn id_set(&self) -> HashSet<NodeId> {
        self.ids().cloned().collect()
    }

    pub fn find(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// A new document with `node` appended at the end.
    pub fn with_appended(&self, node: ContentNode) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        Self { nodes }
    }
}

impl FromIterator<ContentNode> for Document {
    fn from_iter<T: IntoIterator<Item = ContentNode>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A change handed to the document owner.
///
/// `Map` lets a command read-then-append against whatever revision the owner
/// holds when it applies the update, instead of a value captured earlier.
pub enum DocumentUpdate {
    Replace(Document),
    Map(Box<dyn FnOnce(&Document) -> Document>),
}

impl DocumentUpdate {
    pub fn map(f: impl FnOnce(&Document) -> Document + 'static) -> Self {
        Self::Map(Box::new(f))
    }

    /// Produce the next document from `previous`.
    pub fn apply(self, previous: &Document) -> Document {
        match self {
            Self::Replace(next) => next,
            Self::Map(f) => f(previous),
        }
    }
}

impl fmt::Debug for DocumentUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(doc) => f.debug_tuple("Replace").field(doc).finish(),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// The owner of the current document.
///
/// The editor never mutates a document in place; it reads `current()` and
/// hands every change to `set()`.
pub trait DocumentHost {
    fn current(&self) -> &Document;

    fn set(&mut self, update: DocumentUpdate);
}

/// In-memory document owner with a revision counter.
#[derive(Clone, Debug, Default)]
pub struct OwnedDocument {
    document: Document,
    revision: u64,
}

impl OwnedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            revision: 0,
        }
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_inner(self) -> Document {
        self.document
    }
}

impl DocumentHost for OwnedDocument {
    fn current(&self) -> &Document {
        &self.document
    }

    fn set(&mut self, update: DocumentUpdate) {
        self.document = update.apply(&self.document);
        self.revision += 1;
    }
}
