//! Document element types produced by the upstream partitioner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The classified kind of a partitioned document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Section heading
    Title,
    /// Paragraph of prose
    NarrativeText,
    /// One bullet of a list
    ListItem,
    /// Table with raw markup metadata
    Table,
    /// Embedded image
    Image,
    /// Page boundary marker
    PageBreak,
    /// Anything the partitioner could not classify
    Other,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Title => write!(f, "title"),
            ElementKind::NarrativeText => write!(f, "narrative_text"),
            ElementKind::ListItem => write!(f, "list_item"),
            ElementKind::Table => write!(f, "table"),
            ElementKind::Image => write!(f, "image"),
            ElementKind::PageBreak => write!(f, "page_break"),
            ElementKind::Other => write!(f, "other"),
        }
    }
}

/// Whether an element came from the source document or was synthesized
/// by this pipeline.
///
/// Synthesized nodes (rendered table sentences, list groups, split
/// sub-chunks) must not be re-split by later stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the upstream partitioner
    #[default]
    Source,
    /// Synthesized by a pipeline stage
    Generated,
}

/// A hyperlink span inside an element's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Byte offset of the link text within the element text
    pub start_index: usize,

    /// Byte offset one past the link text; must span exactly the anchor text
    pub end_index: usize,

    /// The anchor text
    pub text: String,

    /// The link target
    pub url: String,
}

/// Image payload reference carried on Image elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Base64-encoded bytes or a URL, as supplied by the partitioner
    pub data: String,

    /// MIME type of the image
    pub mime_type: String,
}

/// Metadata attached to an element by the partitioner or by pipeline stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// Heading depth for Title elements (1 = top level)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_depth: Option<u8>,

    /// Raw table markup for Table elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Hyperlink spans within the element text, in text order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Image payload for Image elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    /// Original text preserved when a caption replaces it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_caption: Option<String>,

    /// Source-derived or pipeline-synthesized
    #[serde(default)]
    pub provenance: Provenance,
}

/// One classified unit of a partitioned document.
///
/// Elements are created by the external partitioner and flow through the
/// pipeline stages, which replace them with new elements rather than
/// mutating shared state. Ids are stable unless a node is newly synthesized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, stable across the pipeline
    pub id: Uuid,

    /// Classified element kind
    pub kind: ElementKind,

    /// The element's text content
    pub text: String,

    /// Positional and structural metadata
    pub metadata: ElementMetadata,
}

impl Element {
    /// Create a source element of the given kind.
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            metadata: ElementMetadata::default(),
        }
    }

    /// Create a pipeline-synthesized element carrying the given metadata.
    pub fn generated(kind: ElementKind, text: impl Into<String>, mut metadata: ElementMetadata) -> Self {
        metadata.provenance = Provenance::Generated;
        Self {
            id: Uuid::new_v4(),
            kind,
            text: text.into(),
            metadata,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: ElementMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether this element was synthesized by the pipeline.
    pub fn is_generated(&self) -> bool {
        self.metadata.provenance == Provenance::Generated
    }

    /// Whether this is a Title element.
    pub fn is_title(&self) -> bool {
        self.kind == ElementKind::Title
    }
}

/// A run of elements governed by one heading.
///
/// Groups are ephemeral: created by the grouper, consumed by the semantic
/// splitter within a single pipeline pass. The title element is owned by the
/// group and re-emitted ahead of its nodes, so flattening a group sequence
/// reproduces the original element order.
#[derive(Debug, Clone, Default)]
pub struct ElementGroup {
    /// The Title element governing this group, if any
    pub title: Option<Element>,

    /// The elements between this title and the next
    pub nodes: Vec<Element>,
}

impl ElementGroup {
    /// Create a group with no governing title.
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Create a group opened by the given title element.
    pub fn titled(title: Element) -> Self {
        Self {
            title: Some(title),
            nodes: Vec::new(),
        }
    }

    /// Whether the group carries neither a title nor nodes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.nodes.is_empty()
    }

    /// Flatten back into element order: title first, then nodes.
    pub fn flatten(self) -> Vec<Element> {
        let mut elements = Vec::with_capacity(self.nodes.len() + 1);
        if let Some(title) = self.title {
            elements.push(title);
        }
        elements.extend(self.nodes);
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_marks_provenance() {
        let element = Element::generated(
            ElementKind::NarrativeText,
            "synthesized",
            ElementMetadata::default(),
        );
        assert!(element.is_generated());
    }

    #[test]
    fn test_group_flatten_order() {
        let title = Element::new(ElementKind::Title, "Heading");
        let body = Element::new(ElementKind::NarrativeText, "Body.");
        let title_id = title.id;
        let body_id = body.id;

        let mut group = ElementGroup::titled(title);
        group.nodes.push(body);

        let flat = group.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].id, title_id);
        assert_eq!(flat[1].id, body_id);
    }
}
