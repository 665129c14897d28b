//! Pipeline coordination.
//!
//! Sequences the stages in a fixed order and fans work out/in within each
//! stage. Stage order is load-bearing: table linearization runs before
//! grouping so each table description lands in the group its table belongs
//! to, and the list chunker must see the original ListItem runs before
//! grouping collapses them into title-bounded groups.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capabilities::{Captioner, Embedder};
use crate::error::{Result, Stage};
use crate::stages::captioner::ImageCaptioner;
use crate::stages::filter::remove_small;
use crate::stages::grouper::group_elements;
use crate::stages::links::rewrite_links;
use crate::stages::list::ListChunker;
use crate::stages::splitter::SemanticSplitter;
use crate::stages::table::TableLinearizer;
use crate::stages::window::attach_windows;
use crate::types::{Chunk, Element, PipelineConfig};

/// Per-stage elapsed milliseconds for one pipeline pass.
///
/// Stages that did not run (empty input, no captioner configured) stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub link_rewrite_ms: Option<f64>,
    pub table_linearize_ms: Option<f64>,
    pub list_chunk_ms: Option<f64>,
    pub semantic_split_ms: Option<f64>,
    pub caption_ms: Option<f64>,
    pub window_ms: Option<f64>,
    pub filter_ms: Option<f64>,
}

fn elapsed_ms(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 1000.0 * 10.0).round() / 10.0
}

/// The segmentation pipeline.
///
/// Owns the element sequence for the duration of a pass; the embedding and
/// captioning capabilities are stateless services invoked concurrently
/// within their stages.
pub struct Pipeline {
    config: PipelineConfig,
    splitter: SemanticSplitter,
    table_linearizer: TableLinearizer,
    list_chunker: ListChunker,
    image_captioner: Option<ImageCaptioner>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline, validating the configuration up front.
    ///
    /// Passing no captioner skips the image captioning stage; image
    /// elements then flow through with their original text.
    pub fn new(
        config: PipelineConfig,
        embedder: Arc<dyn Embedder>,
        captioner: Option<Arc<dyn Captioner>>,
    ) -> Result<Self> {
        let config = config.validated()?;
        Ok(Self {
            splitter: SemanticSplitter::new(embedder, &config),
            table_linearizer: TableLinearizer::new(config.caption_scan_window),
            list_chunker: ListChunker::new(
                config.list_inline_max,
                config.list_part_max,
                config.default_heading_depth,
            ),
            image_captioner: captioner.map(ImageCaptioner::new),
            config,
        })
    }

    /// Run the full pipeline over a document's element sequence.
    ///
    /// A failure mid-pipeline yields no chunks and an error naming the
    /// stage; no partially segmented output is ever returned.
    pub async fn run(&self, mut elements: Vec<Element>) -> Result<(Vec<Chunk>, PipelineStats)> {
        let mut stats = PipelineStats::default();

        if elements.is_empty() {
            return Ok((Vec::new(), stats));
        }

        info!(elements = elements.len(), "Starting segmentation pipeline");

        let start = Instant::now();
        rewrite_links(&mut elements).map_err(|e| e.in_stage(Stage::LinkRewrite))?;
        stats.link_rewrite_ms = Some(elapsed_ms(start));

        // Non-consuming: the original Table elements stay in the sequence,
        // each followed by its GENERATED description nodes.
        let start = Instant::now();
        let elements = self.table_linearizer.linearize(elements);
        stats.table_linearize_ms = Some(elapsed_ms(start));

        let start = Instant::now();
        let elements = self.list_chunker.chunk_lists(elements);
        stats.list_chunk_ms = Some(elapsed_ms(start));

        let start = Instant::now();
        let groups = group_elements(elements);
        let elements = self
            .splitter
            .split_groups(groups)
            .await
            .map_err(|e| e.in_stage(Stage::SemanticSplit))?;
        stats.semantic_split_ms = Some(elapsed_ms(start));

        let elements = match &self.image_captioner {
            Some(captioner) => {
                let start = Instant::now();
                let elements = captioner.caption_images(elements).await;
                stats.caption_ms = Some(elapsed_ms(start));
                elements
            }
            None => elements,
        };

        let start = Instant::now();
        let mut chunks: Vec<Chunk> = elements.into_iter().map(Chunk::from_element).collect();
        attach_windows(&mut chunks, self.config.neighbor_cap);
        stats.window_ms = Some(elapsed_ms(start));

        let start = Instant::now();
        let chunks = remove_small(chunks, self.config.min_chunk_chars);
        stats.filter_ms = Some(elapsed_ms(start));

        info!(chunks = chunks.len(), "Segmentation pipeline complete");

        Ok((chunks, stats))
    }
}
