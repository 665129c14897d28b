//! Error taxonomy for the segmentation pipeline.
//!
//! Collaborator failures (embedding/captioning calls, malformed upstream
//! metadata) abort the owning document and name the failing stage. Malformed
//! structural input (sparse table cells, empty list runs) is degraded locally
//! inside the stages and never reaches this type. Configuration errors are
//! rejected at construction time.

use thiserror::Error;

/// The pipeline stage in which a failure occurred.
///
/// Only the stages that can abort a document appear here. The structural
/// stages (tables, lists, windows, filtering) degrade locally and never
/// fail, and caption failures are absorbed per-item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Hyperlink span substitution
    LinkRewrite,
    /// Embedding-distance semantic splitting
    SemanticSplit,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::LinkRewrite => write!(f, "link_rewrite"),
            Stage::SemanticSplit => write!(f, "semantic_split"),
        }
    }
}

/// Errors surfaced by the segmentation pipeline.
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// Rejected at construction time, never at per-document runtime.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The embedding service violated its protocol by returning a result
    /// sequence of a different length than the input batch.
    #[error("embedding service returned {got} vectors for {expected} texts")]
    EmbeddingShape { expected: usize, got: usize },

    /// The embedding call itself failed.
    #[error("embedding request failed: {0}")]
    Embedding(String),

    /// The captioning call failed.
    #[error("captioning request failed: {0}")]
    Caption(String),

    /// Upstream element metadata was inconsistent with the element text.
    #[error("malformed element metadata: {0}")]
    Metadata(String),

    /// A stage aborted processing of the document. Carries the stage
    /// identity so callers know where the pipeline stopped.
    #[error("stage {stage} failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<SegmenterError>,
    },
}

impl SegmenterError {
    /// Wrap an error with the stage it occurred in.
    pub fn in_stage(self, stage: Stage) -> Self {
        SegmenterError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }

    /// The stage this error occurred in, if it has been attributed.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SegmenterError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SegmenterError>;
