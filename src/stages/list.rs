//! List run grouping into size-bounded, labeled text blocks.
//!
//! Consecutive ListItem elements are one semantic unit. Short runs become a
//! single bullet-joined node; long runs are bin-packed into labeled parts
//! under the governing header so no part dominates retrieval.

use crate::stages::visible_len;
use crate::types::{Element, ElementKind, ElementMetadata};

/// Header context captured from the element immediately preceding a list run.
struct ListHeader {
    text: String,
    heading_depth: Option<u8>,
}

impl ListHeader {
    fn from_element(element: &Element) -> Self {
        Self {
            text: element.text.clone(),
            heading_depth: element.metadata.heading_depth,
        }
    }
}

/// Groups consecutive list items into narrative nodes.
pub struct ListChunker {
    /// Runs whose joined text is shorter than this become one unlabeled node
    inline_max: usize,
    /// Character budget per labeled part when bin-packing
    part_max: usize,
    /// Heading depth assumed when the header element carries none
    default_heading_depth: u8,
}

impl ListChunker {
    /// Create a list chunker with the given size bounds.
    pub fn new(inline_max: usize, part_max: usize, default_heading_depth: u8) -> Self {
        Self {
            inline_max,
            part_max,
            default_heading_depth,
        }
    }

    /// Replace every run of consecutive ListItem elements with grouped
    /// narrative nodes. Page-break markers are dropped first, so a list
    /// spanning pages still forms one run. Other elements pass through in
    /// order.
    pub fn chunk_lists(&self, elements: Vec<Element>) -> Vec<Element> {
        let mut out: Vec<Element> = Vec::with_capacity(elements.len());
        let mut run: Vec<Element> = Vec::new();
        let mut header: Option<ListHeader> = None;

        for element in elements
            .into_iter()
            .filter(|e| e.kind != ElementKind::PageBreak)
        {
            if element.kind == ElementKind::ListItem {
                if run.is_empty() {
                    header = out.last().and_then(|prev| {
                        matches!(
                            prev.kind,
                            ElementKind::NarrativeText | ElementKind::Title
                        )
                        .then(|| ListHeader::from_element(prev))
                    });
                }
                run.push(element);
            } else {
                if !run.is_empty() {
                    out.extend(self.render_run(&run, header.take()));
                    run.clear();
                }
                out.push(element);
            }
        }

        // A document ending in a list still flushes its final run.
        if !run.is_empty() {
            out.extend(self.render_run(&run, header.take()));
        }

        out
    }

    /// Deconstruct one list run into one or more narrative nodes.
    fn render_run(&self, run: &[Element], header: Option<ListHeader>) -> Vec<Element> {
        if run.is_empty() {
            return Vec::new();
        }

        let bullets: Vec<String> = run.iter().map(|item| format!("- {}", item.text)).collect();
        let full_text = bullets.join("\n");

        if visible_len(&full_text) < self.inline_max {
            return vec![Element::generated(
                ElementKind::NarrativeText,
                full_text,
                ElementMetadata::default(),
            )];
        }

        let header_title = header
            .as_ref()
            .map(|h| h.text.clone())
            .unwrap_or_else(|| "Untitled".to_string());
        let depth = header
            .as_ref()
            .and_then(|h| h.heading_depth)
            .unwrap_or(self.default_heading_depth) as usize;
        let header_level = "#".repeat(depth + 1);
        let sub_level = format!("{}#", header_level);

        let make_part = |lines: &[String], part: usize| -> Element {
            let text = format!(
                "{} {}\n\n{} Part {}:\n\n{}",
                header_level,
                header_title,
                sub_level,
                part,
                lines.join("\n")
            );
            Element::generated(ElementKind::NarrativeText, text, ElementMetadata::default())
        };

        let mut nodes = Vec::new();
        let mut part = 1;
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0;

        for bullet in bullets {
            let bullet_len = visible_len(&bullet);
            if current_len + bullet_len > self.part_max && !current.is_empty() {
                nodes.push(make_part(&current, part));
                part += 1;
                current.clear();
                current_len = 0;
            }
            current_len += bullet_len;
            current.push(bullet);
        }

        if !current.is_empty() {
            nodes.push(make_part(&current, part));
        }

        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provenance;
    use pretty_assertions::assert_eq;

    fn chunker() -> ListChunker {
        ListChunker::new(750, 1500, 2)
    }

    fn item(text: &str) -> Element {
        Element::new(ElementKind::ListItem, text)
    }

    fn title(text: &str) -> Element {
        Element::new(ElementKind::Title, text)
    }

    fn narrative(text: &str) -> Element {
        Element::new(ElementKind::NarrativeText, text)
    }

    fn page_break() -> Element {
        Element::new(ElementKind::PageBreak, "")
    }

    /// Items sized so the bullet-joined run text has exactly `total` chars.
    fn run_of_length(total: usize) -> Vec<Element> {
        // Each bullet contributes "- " (2) plus its text, joined by "\n" (1).
        // Use a single long item: "- " + text = total.
        vec![item(&"x".repeat(total - 2))]
    }

    #[test]
    fn test_short_run_single_unlabeled_node() {
        let elements = vec![narrative("Topics:"), item("alpha"), item("beta"), narrative("after")];
        let out = chunker().chunk_lists(elements);

        assert_eq!(out.len(), 3);
        assert_eq!(out[1].text, "- alpha\n- beta");
        assert_eq!(out[1].metadata.provenance, Provenance::Generated);
        assert!(!out[1].text.contains("Part"));
    }

    #[test]
    fn test_749_chars_stays_single() {
        let mut elements = run_of_length(749);
        elements.push(narrative("after"));
        let out = chunker().chunk_lists(elements);

        assert_eq!(out.len(), 2);
        assert!(!out[0].text.contains("Part"));
    }

    #[test]
    fn test_751_chars_gets_part_labels() {
        let mut elements = vec![title("Reading List")];
        elements.extend(run_of_length(751));
        let out = chunker().chunk_lists(elements);

        assert!(out.iter().any(|e| e.text.contains("Part 1:")));
        assert!(out.iter().any(|e| e.text.contains("Reading List")));
    }

    #[test]
    fn test_long_run_bin_packed_into_parts() {
        let elements: Vec<Element> = std::iter::once(title("Syllabus"))
            .chain((0..40).map(|i| item(&format!("{} {}", "entry".repeat(20), i))))
            .collect();
        let out = chunker().chunk_lists(elements);

        // Title passes through, followed by multiple labeled parts.
        let parts: Vec<_> = out.iter().filter(|e| e.text.contains("Part")).collect();
        assert!(parts.len() > 1);
        assert!(parts[0].text.starts_with("### Syllabus\n\n#### Part 1:"));
        assert!(parts[1].text.contains("Part 2:"));
    }

    #[test]
    fn test_header_depth_drives_markdown_level() {
        let mut header = title("Deep Section");
        header.metadata.heading_depth = Some(3);

        let mut elements = vec![header];
        elements.extend((0..40).map(|i| item(&format!("{} {}", "entry".repeat(20), i))));
        let out = chunker().chunk_lists(elements);

        let part = out.iter().find(|e| e.text.contains("Part 1:")).unwrap();
        assert!(part.text.starts_with("#### Deep Section\n\n##### Part 1:"));
    }

    #[test]
    fn test_untitled_header_fallback() {
        let elements: Vec<Element> =
            (0..40).map(|i| item(&format!("{} {}", "entry".repeat(20), i))).collect();
        let out = chunker().chunk_lists(elements);

        assert!(out[0].text.contains("Untitled"));
    }

    #[test]
    fn test_page_breaks_do_not_split_runs() {
        let elements = vec![item("one"), page_break(), item("two")];
        let out = chunker().chunk_lists(elements);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "- one\n- two");
    }

    #[test]
    fn test_trailing_run_flushed() {
        let elements = vec![narrative("before"), item("last bullet")];
        let out = chunker().chunk_lists(elements);

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "- last bullet");
    }
}
