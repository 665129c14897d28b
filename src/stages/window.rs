//! Neighbor window context attachment.
//!
//! Each chunk gets a `window` metadata string built from its trimmed
//! neighbors. The window is advisory retrieval context only, never a
//! substitute for the chunk's primary text.

use crate::stages::visible_len;
use crate::types::Chunk;

/// Attach window context metadata to every chunk in the sequence.
///
/// The window is `prev + " " + self + " " + next`, all trimmed. Boundary
/// chunks omit the missing side. A neighbor longer than `neighbor_cap`
/// characters is excluded rather than truncated, and an oversized chunk
/// takes no neighbors at all, so one oversized element cannot dominate
/// a window. Chunk texts are trimmed in place as a side effect.
pub fn attach_windows(chunks: &mut [Chunk], neighbor_cap: usize) {
    for chunk in chunks.iter_mut() {
        let trimmed = chunk.text.trim().to_string();
        chunk.text = trimmed;
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

    for (idx, chunk) in chunks.iter_mut().enumerate() {
        let own_bounded = visible_len(&texts[idx]) <= neighbor_cap;
        let mut window = texts[idx].clone();

        if idx > 0 {
            let prev = &texts[idx - 1];
            if own_bounded && visible_len(prev) <= neighbor_cap {
                window = format!("{} {}", prev, window);
            }
        }

        if idx + 1 < texts.len() {
            let next = &texts[idx + 1];
            if own_bounded && visible_len(next) <= neighbor_cap {
                window = format!("{} {}", window, next);
            }
        }

        chunk.metadata.window = Some(window.trim().to_string());
    }
}
