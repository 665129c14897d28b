//! HTTP client for the embedding service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Embedder;
use crate::error::{Result, SegmenterError};

/// Embedder backed by an HTTP embedding service.
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
}

/// Request payload for a batch embedding call.
#[derive(Debug, Serialize)]
struct EmbedBatchRequest<'a> {
    texts: &'a [String],
}

/// Response from the embedding service.
#[derive(Debug, Deserialize)]
struct EmbedBatchResponse {
    embeddings: Vec<Vec<f32>>,
}

impl HttpEmbedder {
    /// Create a new embedding client.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }

    /// Check if the embedding service is healthy.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embed/batch", self.base_url);

        debug!(batch_size = texts.len(), "Requesting embeddings");

        let response = self
            .client
            .post(&url)
            .json(&EmbedBatchRequest { texts })
            .send()
            .await
            .map_err(|e| SegmenterError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SegmenterError::Embedding(format!(
                "embedding service returned {}: {}",
                status, body
            )));
        }

        let result: EmbedBatchResponse = response
            .json()
            .await
            .map_err(|e| SegmenterError::Embedding(e.to_string()))?;

        if result.embeddings.len() != texts.len() {
            return Err(SegmenterError::EmbeddingShape {
                expected: texts.len(),
                got: result.embeddings.len(),
            });
        }

        Ok(result.embeddings)
    }
}
