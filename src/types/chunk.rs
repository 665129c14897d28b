//! Chunk type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Element, ElementKind, Provenance};

/// A chunk of content ready for retrieval indexing.
///
/// Chunks are the pipeline's output unit. Their order matches the relative
/// order of the originating elements; splitting may increase the count but
/// never reorders surviving content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: Uuid,

    /// Kind of the originating element
    pub kind: ElementKind,

    /// The primary text content of the chunk
    pub text: String,

    /// Additional metadata about this chunk
    pub metadata: ChunkMetadata,

    /// When this chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Build a chunk from a processed element, inheriting its id and metadata.
    pub fn from_element(element: Element) -> Self {
        Self {
            id: element.id,
            kind: element.kind,
            text: element.text,
            metadata: ChunkMetadata {
                heading_depth: element.metadata.heading_depth,
                auto_caption: element.metadata.auto_caption,
                provenance: element.metadata.provenance,
                window: None,
            },
            created_at: Utc::now(),
        }
    }

    /// Get the length of the chunk text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Metadata associated with a chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Neighbor-derived context: trimmed previous + own + next text.
    /// Advisory only, never a substitute for the primary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,

    /// Original text preserved when an image caption replaced it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_caption: Option<String>,

    /// Heading depth inherited from a Title element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_depth: Option<u8>,

    /// Whether the originating element was source-derived or synthesized
    #[serde(default)]
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementMetadata;

    #[test]
    fn test_from_element_keeps_id() {
        let element = Element::new(ElementKind::NarrativeText, "Some prose.");
        let id = element.id;
        let chunk = Chunk::from_element(element);
        assert_eq!(chunk.id, id);
        assert_eq!(chunk.kind, ElementKind::NarrativeText);
        assert_eq!(chunk.text, "Some prose.");
    }

    #[test]
    fn test_from_element_inherits_metadata() {
        let mut metadata = ElementMetadata::default();
        metadata.heading_depth = Some(3);
        metadata.auto_caption = Some("original alt text".to_string());
        let element = Element::new(ElementKind::Image, "caption text").with_metadata(metadata);

        let chunk = Chunk::from_element(element);
        assert_eq!(chunk.metadata.heading_depth, Some(3));
        assert_eq!(
            chunk.metadata.auto_caption.as_deref(),
            Some("original alt text")
        );
    }

    #[test]
    fn test_len_counts_chars() {
        let element = Element::new(ElementKind::NarrativeText, "héllo");
        let chunk = Chunk::from_element(element);
        assert_eq!(chunk.len(), 5);
    }

    #[test]
    fn test_serialized_form_omits_unset_metadata() {
        let chunk = Chunk::from_element(Element::new(ElementKind::NarrativeText, "Some prose."));
        let value = serde_json::to_value(&chunk).unwrap();

        let metadata = value.get("metadata").unwrap();
        assert!(metadata.get("window").is_none());
        assert!(metadata.get("auto_caption").is_none());
        assert!(metadata.get("heading_depth").is_none());
        assert_eq!(value["metadata"]["provenance"], "source");
        assert_eq!(value["kind"], "narrative_text");
    }
}
