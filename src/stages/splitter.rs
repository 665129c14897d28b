//! Embedding-distance semantic splitting of narrative text.
//!
//! Long paragraphs are subdivided at the sentence boundaries where adjacent
//! sentence embeddings diverge the most. Each sentence is embedded together
//! with a sliding window of its neighbors so the model sees local context,
//! then a chunk boundary is inserted wherever the cosine distance between
//! adjacent windows exceeds a percentile of the distance distribution.
//!
//! Groups and their eligible nodes are processed concurrently; the first
//! embedding failure cancels the remaining work and aborts the document.
//! Partial semantic splitting would silently degrade retrieval quality.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::capabilities::Embedder;
use crate::error::{Result, SegmenterError};
use crate::types::{Element, ElementGroup, ElementKind, PipelineConfig};

/// One sentence during a single splitter invocation.
///
/// Discarded after chunk assembly.
struct SentenceUnit {
    /// The sentence itself
    sentence: String,
    /// Sliding-window concatenation used only for embedding context
    combined: String,
    /// Embedding of the combined window
    embedding: Vec<f32>,
    /// Cosine distance to the next unit's embedding
    distance_to_next: Option<f32>,
}

/// Subdivides narrative nodes using sentence-embedding similarity.
pub struct SemanticSplitter {
    embedder: Arc<dyn Embedder>,
    breakpoint_percentile: f64,
    window_radius: usize,
    default_heading_depth: u8,
}

impl SemanticSplitter {
    /// Create a splitter over the given embedding capability.
    pub fn new(embedder: Arc<dyn Embedder>, config: &PipelineConfig) -> Self {
        Self {
            embedder,
            breakpoint_percentile: config.breakpoint_percentile,
            window_radius: config.window_radius,
            default_heading_depth: config.default_heading_depth,
        }
    }

    /// Split every eligible narrative node in every group, concurrently,
    /// and reassemble the results in the original order.
    ///
    /// Non-narrative elements and GENERATED narrative nodes pass through
    /// untouched. The flattened output preserves group order, and within a
    /// group the node and sub-chunk order.
    pub async fn split_groups(&self, groups: Vec<ElementGroup>) -> Result<Vec<Element>> {
        let group_futures = groups.into_iter().map(|group| self.split_group(group));
        let split_groups = try_join_all(group_futures).await?;
        Ok(split_groups.into_iter().flatten().collect())
    }

    async fn split_group(&self, group: ElementGroup) -> Result<Vec<Element>> {
        let heading = group.title.as_ref().map(|title| {
            let depth = title
                .metadata
                .heading_depth
                .unwrap_or(self.default_heading_depth) as usize;
            format!("{} {}", "#".repeat(depth), title.text)
        });

        let node_futures = group.nodes.into_iter().map(|node| {
            let heading = heading.clone();
            async move {
                if node.kind == ElementKind::NarrativeText && !node.is_generated() {
                    self.split_node(node, heading.as_deref()).await
                } else {
                    Ok(vec![node])
                }
            }
        });

        let split_nodes = try_join_all(node_futures).await?;

        let mut out = Vec::new();
        if let Some(title) = group.title {
            out.push(title);
        }
        out.extend(split_nodes.into_iter().flatten());
        Ok(out)
    }

    /// Split a single narrative node into semantically coherent sub-chunks.
    async fn split_node(&self, node: Element, heading: Option<&str>) -> Result<Vec<Element>> {
        let sentences = split_sentences(&node.text);

        // Nothing to subdivide; re-emit as a single (prefixed) chunk without
        // spending an embedding call.
        if sentences.len() < 2 {
            let text = sentences.into_iter().next().unwrap_or_default();
            if text.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![self.make_chunk_node(&node, heading, text)]);
        }

        let mut units = self.build_sentence_units(sentences);
        self.embed_units(&mut units).await?;
        compute_distances(&mut units);

        let distances: Vec<f32> = units
            .iter()
            .filter_map(|unit| unit.distance_to_next)
            .collect();
        let threshold = percentile(&distances, self.breakpoint_percentile);

        debug!(
            node_id = %node.id,
            sentences = units.len(),
            threshold,
            "Assembling semantic sub-chunks"
        );

        let mut chunks: Vec<Element> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for unit in &units {
            current.push(&unit.sentence);
            if unit.distance_to_next.map_or(false, |d| d > threshold) {
                chunks.push(self.make_chunk_node(&node, heading, current.join(" ")));
                current.clear();
            }
        }
        if !current.is_empty() {
            chunks.push(self.make_chunk_node(&node, heading, current.join(" ")));
        }

        Ok(chunks)
    }

    /// Build sentence units with their combined embedding windows.
    fn build_sentence_units(&self, sentences: Vec<String>) -> Vec<SentenceUnit> {
        let radius = self.window_radius;
        let count = sentences.len();

        (0..count)
            .map(|i| {
                let start = i.saturating_sub(radius);
                let end = (i + radius + 1).min(count);
                let combined = sentences[start..end].join(" ");
                SentenceUnit {
                    sentence: sentences[i].clone(),
                    combined,
                    embedding: Vec::new(),
                    distance_to_next: None,
                }
            })
            .collect()
    }

    /// Batch-embed the combined windows, enforcing the same-length,
    /// same-order protocol.
    async fn embed_units(&self, units: &mut [SentenceUnit]) -> Result<()> {
        let texts: Vec<String> = units.iter().map(|unit| unit.combined.clone()).collect();
        let embeddings = self.embedder.batch_embed(&texts).await?;

        if embeddings.len() != units.len() {
            return Err(SegmenterError::EmbeddingShape {
                expected: units.len(),
                got: embeddings.len(),
            });
        }

        for (unit, embedding) in units.iter_mut().zip(embeddings) {
            unit.embedding = embedding;
        }
        Ok(())
    }

    /// Re-emit split text as a new narrative node, prefixed with the
    /// governing group title rendered as a markdown heading.
    fn make_chunk_node(&self, source: &Element, heading: Option<&str>, text: String) -> Element {
        let text = match heading {
            Some(heading) => format!("{}\n{}", heading, text),
            None => text,
        };
        let mut metadata = source.metadata.clone();
        metadata.links = Vec::new();
        Element::generated(ElementKind::NarrativeText, text, metadata)
    }
}

/// Compute `1 - cosine_similarity` between each adjacent pair of units.
fn compute_distances(units: &mut [SentenceUnit]) {
    for i in 0..units.len().saturating_sub(1) {
        let distance = 1.0 - cosine_similarity(&units[i].embedding, &units[i + 1].embedding);
        units[i].distance_to_next = Some(distance);
    }
}

/// Cosine similarity of two vectors; 0 when either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Linearly interpolated percentile of a distance distribution.
fn percentile(values: &[f32], pct: f64) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let fraction = (rank - lower as f64) as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Split text at sentence boundaries (`.`, `!`, `?` followed by whitespace
/// or end of text).
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    const DELIMITERS: [char; 3] = ['.', '!', '?'];

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if DELIMITERS.contains(&c) && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
            while chars.peek().map_or(false, |next| next.is_whitespace()) {
                chars.next();
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}
