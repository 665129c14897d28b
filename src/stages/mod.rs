//! Pipeline stages, one module per stage.
//!
//! Stages execute strictly sequentially; each fully consumes the previous
//! stage's output. Every stage consumes and produces element sequences
//! rather than mutating shared state, so inter-stage ordering hazards
//! cannot arise.

pub mod captioner;
pub mod filter;
pub mod grouper;
pub mod links;
pub mod list;
pub mod splitter;
pub mod table;
pub mod window;

use unicode_segmentation::UnicodeSegmentation;

/// Visible length of a text in grapheme clusters.
///
/// All character-based thresholds (list budgets, window caps, the minimum
/// chunk length) count user-perceived characters, not bytes.
pub(crate) fn visible_len(text: &str) -> usize {
    text.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_len_multibyte() {
        assert_eq!(visible_len("héllo"), 5);
        assert_eq!(visible_len(""), 0);
    }
}
