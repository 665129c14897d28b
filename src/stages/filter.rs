//! Minimum-length chunk filtering.

use tracing::debug;

use crate::stages::visible_len;
use crate::types::Chunk;

/// Drop chunks whose primary text is strictly shorter than `min_chars`.
///
/// Pure, stateless, order-preserving on survivors.
pub fn remove_small(chunks: Vec<Chunk>, min_chars: usize) -> Vec<Chunk> {
    let before = chunks.len();
    let survivors: Vec<Chunk> = chunks
        .into_iter()
        .filter(|chunk| visible_len(&chunk.text) >= min_chars)
        .collect();

    if survivors.len() != before {
        debug!(
            dropped = before - survivors.len(),
            min_chars, "Removed degenerate chunks"
        );
    }

    survivors
}
