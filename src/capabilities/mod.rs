//! Capability traits consumed by the pipeline.
//!
//! The pipeline never talks to a model directly; it consumes these two
//! stateless, reentrant capabilities. Both may be invoked concurrently
//! with no additional locking.

mod caption;
mod embedding;

pub use caption::HttpCaptioner;
pub use embedding::HttpEmbedder;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ImageRef;

/// Batch sentence-embedding capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    ///
    /// The returned sequence must have the same length and order as the
    /// input; a mismatched result is a protocol violation and fails the
    /// call with [`SegmenterError::EmbeddingShape`].
    ///
    /// [`SegmenterError::EmbeddingShape`]: crate::error::SegmenterError::EmbeddingShape
    async fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Vision-model image captioning capability.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Produce a retrieval-oriented prose description of the image.
    async fn caption(&self, image: &ImageRef) -> Result<String>;
}
