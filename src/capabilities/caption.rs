//! HTTP client for the image captioning service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Captioner;
use crate::error::{Result, SegmenterError};
use crate::types::ImageRef;

/// Instruction sent alongside the image. Descriptions land directly in the
/// vector index, so they must read as retrieval text rather than commentary.
const CAPTION_PROMPT: &str = "Describe everything in the image in plain, direct \
language suitable for retrieval indexing. Write out any formulae in plain text. \
Do not open with phrases like 'This image shows'; describe the content itself.";

/// Captioner backed by an HTTP vision service.
pub struct HttpCaptioner {
    client: Client,
    base_url: String,
}

/// Request payload for a caption call.
#[derive(Debug, Serialize)]
struct CaptionRequest<'a> {
    image: &'a str,
    mime_type: &'a str,
    prompt: &'static str,
}

/// Response from the captioning service.
#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

impl HttpCaptioner {
    /// Create a new captioning client.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl Captioner for HttpCaptioner {
    async fn caption(&self, image: &ImageRef) -> Result<String> {
        let url = format!("{}/caption", self.base_url);

        debug!(mime_type = %image.mime_type, "Requesting image caption");

        let response = self
            .client
            .post(&url)
            .json(&CaptionRequest {
                image: &image.data,
                mime_type: &image.mime_type,
                prompt: CAPTION_PROMPT,
            })
            .send()
            .await
            .map_err(|e| SegmenterError::Caption(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SegmenterError::Caption(format!(
                "captioning service returned {}: {}",
                status, body
            )));
        }

        let result: CaptionResponse = response
            .json()
            .await
            .map_err(|e| SegmenterError::Caption(e.to_string()))?;

        Ok(result.caption)
    }
}
