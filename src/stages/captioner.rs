//! Image caption substitution.
//!
//! Replaces each Image element's text with a vision-model description so
//! images become searchable prose. The original text (typically alt text)
//! is preserved in `auto_caption` metadata. Caption failures are per-item:
//! the element is retained unmodified and the failure logged, unlike the
//! fail-fast embedding policy.

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::capabilities::Captioner;
use crate::types::{Element, ElementKind};

/// Attaches vision-model captions to Image elements.
pub struct ImageCaptioner {
    captioner: Arc<dyn Captioner>,
}

impl ImageCaptioner {
    /// Create a captioning stage over the given capability.
    pub fn new(captioner: Arc<dyn Captioner>) -> Self {
        Self { captioner }
    }

    /// Caption every Image element carrying a payload, concurrently,
    /// preserving element order.
    pub async fn caption_images(&self, elements: Vec<Element>) -> Vec<Element> {
        let futures = elements
            .into_iter()
            .map(|element| self.caption_element(element));
        join_all(futures).await
    }

    async fn caption_element(&self, mut element: Element) -> Element {
        if element.kind != ElementKind::Image {
            return element;
        }

        let image = match &element.metadata.image {
            Some(image) => image,
            None => return element,
        };

        match self.captioner.caption(image).await {
            Ok(caption) => {
                element.metadata.auto_caption = Some(std::mem::take(&mut element.text));
                element.text = format!(
                    "[IMAGE {} DESCRIPTION START]{}[IMAGE {} DESCRIPTION END]",
                    element.id, caption, element.id
                );
                element
            }
            Err(e) => {
                warn!(element_id = %element.id, error = %e, "Captioning failed, retaining element");
                element
            }
        }
    }
}
