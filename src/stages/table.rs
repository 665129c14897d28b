//! Table linearization into ranked natural-language sentences.
//!
//! Converts the structural markup of each Table element into prose that an
//! embedding model can treat like any other paragraph. This pass is
//! non-consuming: the original Table element stays in the sequence and the
//! rendered description is appended after it as a GENERATED narrative node.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use crate::types::{Element, ElementKind, ElementMetadata};

/// Caption used when no Title precedes the table within the scan window.
pub const UNTITLED_TABLE: &str = "Untitled Table";

lazy_static! {
    static ref TABLE_SELECTOR: Selector = Selector::parse("table").unwrap();
    static ref ROW_SELECTOR: Selector = Selector::parse("tr").unwrap();
    static ref CELL_SELECTOR: Selector = Selector::parse("td, th").unwrap();
    static ref ANCHOR_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
}

/// Renders table markup into prose sentences.
pub struct TableLinearizer {
    /// How many preceding elements to scan backwards for a caption
    caption_scan_window: usize,
}

impl TableLinearizer {
    /// Create a linearizer with the given caption scan window.
    pub fn new(caption_scan_window: usize) -> Self {
        Self {
            caption_scan_window,
        }
    }

    /// Run the non-consuming linearization pass over the element sequence.
    ///
    /// Every Table element is kept in place; its rendered description nodes
    /// follow it immediately. Tables without markup metadata are skipped.
    pub fn linearize(&self, elements: Vec<Element>) -> Vec<Element> {
        // Rendering reads the surrounding input sequence (caption back-scan),
        // so generated nodes are computed against the input before stitching.
        let mut rendered: HashMap<usize, Vec<Element>> = HashMap::new();

        for (idx, element) in elements.iter().enumerate() {
            if element.kind != ElementKind::Table {
                continue;
            }

            let html = match &element.metadata.html {
                Some(html) => html,
                None => {
                    debug!(element_id = %element.id, "Table element has no markup, skipping");
                    continue;
                }
            };

            let grids = parse_grids(html);
            if grids.is_empty() {
                debug!(element_id = %element.id, "Table markup contained no parseable table");
                continue;
            }

            let caption = self.find_caption(&elements, idx);
            let nodes = grids
                .iter()
                .map(|grid| {
                    let metadata = ElementMetadata {
                        heading_depth: element.metadata.heading_depth,
                        ..Default::default()
                    };
                    Element::generated(
                        ElementKind::NarrativeText,
                        render_grid(&caption, grid),
                        metadata,
                    )
                })
                .collect();

            rendered.insert(idx, nodes);
        }

        let mut out = Vec::with_capacity(elements.len() + rendered.len());
        for (idx, element) in elements.into_iter().enumerate() {
            out.push(element);
            if let Some(nodes) = rendered.remove(&idx) {
                out.extend(nodes);
            }
        }

        out
    }

    /// Resolve the governing caption by scanning the preceding window of
    /// elements, closest to farthest, for the first Title.
    fn find_caption(&self, elements: &[Element], idx: usize) -> String {
        let start = idx.saturating_sub(self.caption_scan_window);
        elements[start..idx]
            .iter()
            .rev()
            .find(|e| e.is_title())
            .map(|title| title.text.trim().to_string())
            .unwrap_or_else(|| UNTITLED_TABLE.to_string())
    }
}

/// Parse the markup into row-major grids of cell texts, one grid per table.
///
/// Header cells are treated as data cells. A cell containing a hyperlink is
/// rendered inline as `[text](url)`.
fn parse_grids(html: &str) -> Vec<Vec<Vec<String>>> {
    let document = Html::parse_fragment(html);

    document
        .select(&TABLE_SELECTOR)
        .map(|table| {
            table
                .select(&ROW_SELECTOR)
                .map(|row| row.select(&CELL_SELECTOR).map(render_cell).collect())
                .collect()
        })
        .collect()
}

fn render_cell(cell: ElementRef<'_>) -> String {
    let text = cell.text().collect::<String>().trim().to_string();

    if let Some(anchor) = cell.select(&ANCHOR_SELECTOR).next() {
        if let Some(href) = anchor.value().attr("href") {
            return format!("[{}]({})", text, href);
        }
    }

    text
}

/// Render one grid as a paragraph of axis-label sentences prefixed by the
/// caption.
///
/// Row 0 and column 0 are treated as axis labels. A grid with fewer than
/// 2 rows or 2 columns yields the caption line only. Rows with an empty
/// label cell are skipped, as is any (header, value) pair with an empty
/// side; sparse cells degrade silently rather than failing.
fn render_grid(caption: &str, grid: &[Vec<String>]) -> String {
    let mut text = format!("*{}*\n ", caption);

    let rows = grid.len();
    let cols = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    if rows < 2 || cols < 2 {
        return text;
    }

    for j in 1..rows {
        let corner = cell(grid, 0, 0);
        let row_label = cell(grid, j, 0);
        if row_label.is_empty() {
            continue;
        }

        if !corner.is_empty() {
            text.push_str(&format!("The following {}: {} has ", corner, row_label));
        }

        for k in 1..cols - 1 {
            let header = cell(grid, 0, k);
            let value = cell(grid, j, k);
            let next_header = cell(grid, 0, k + 1);
            let next_value = cell(grid, j, k + 1);

            if header.is_empty() || value.is_empty() || next_header.is_empty() || next_value.is_empty()
            {
                continue;
            }

            text.push_str(&format!("the following {}: {} has ", header, value));
            text.push_str(&format!("the following {}: {}, ", next_header, next_value));
        }
    }

    text
}

fn cell<'a>(grid: &'a [Vec<String>], j: usize, k: usize) -> &'a str {
    grid.get(j)
        .and_then(|row| row.get(k))
        .map(|value| value.trim())
        .unwrap_or("")
}
