//! Semantic Document Segmentation Pipeline
//!
//! Converts a flat, typed sequence of document elements produced by an
//! external partitioner into an ordered sequence of self-contained text
//! chunks suitable for retrieval indexing. Combines title-bounded grouping,
//! embedding-distance semantic splitting, structural linearization of
//! tables and lists, and windowed-context stitching.

pub mod capabilities;
pub mod error;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use capabilities::{Captioner, Embedder, HttpCaptioner, HttpEmbedder};
pub use error::{Result, SegmenterError, Stage};
pub use pipeline::{Pipeline, PipelineStats};
pub use types::{Chunk, ChunkMetadata, Element, ElementKind, PipelineConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capabilities::{Captioner, Embedder};
    pub use crate::error::{Result, SegmenterError, Stage};
    pub use crate::pipeline::{Pipeline, PipelineStats};
    pub use crate::types::*;
}

/// Default percentile of the distance distribution used for breakpoints
pub const DEFAULT_BREAKPOINT_PERCENTILE: f64 = 95.0;

/// Default sentence radius of the combined embedding window
pub const DEFAULT_WINDOW_RADIUS: usize = 1;

/// Default heading depth when a Title carries none
pub const DEFAULT_HEADING_DEPTH: u8 = 2;

/// Lists shorter than this many characters stay a single unlabeled node
pub const DEFAULT_LIST_INLINE_MAX: usize = 750;

/// Character budget per labeled list part
pub const DEFAULT_LIST_PART_MAX: usize = 1500;

/// How far back to scan for a table caption
pub const DEFAULT_CAPTION_SCAN_WINDOW: usize = 25;

/// Neighbor texts longer than this are excluded from window context
pub const DEFAULT_NEIGHBOR_CAP: usize = 1000;

/// Minimum chunk length in characters
pub const DEFAULT_MIN_CHUNK_CHARS: usize = 10;
