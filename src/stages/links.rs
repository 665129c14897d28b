//! Hyperlink substitution into element text.
//!
//! Rewrites each hyperlink span as a Markdown `[text](url)` link directly in
//! the element text, so the URL survives as natural language through the rest
//! of the pipeline. Consumes the link metadata in the process.

use crate::error::{Result, SegmenterError};
use crate::types::Element;

/// Rewrite hyperlink spans into Markdown for every element that carries them.
///
/// Span offsets reference the original text; each substitution shifts later
/// spans by the length delta of the inserted Markdown.
pub fn rewrite_links(elements: &mut [Element]) -> Result<()> {
    for element in elements.iter_mut() {
        if element.metadata.links.is_empty() {
            continue;
        }
        rewrite_element(element)?;
    }
    Ok(())
}

fn rewrite_element(element: &mut Element) -> Result<()> {
    let links = std::mem::take(&mut element.metadata.links);
    let mut delta: isize = 0;

    for link in links {
        let start = link.start_index as isize + delta;
        let end = link.end_index as isize + delta;
        if start < 0 || end < start {
            return Err(SegmenterError::Metadata(format!(
                "link span for {:?} is out of order",
                link.text
            )));
        }
        let (start, end) = (start as usize, end as usize);

        if end - start != link.text.len() {
            return Err(SegmenterError::Metadata(format!(
                "link span {}..{} spans {} bytes but anchor text {:?} has {}",
                start,
                end,
                end - start,
                link.text,
                link.text.len()
            )));
        }

        let span_matches = element
            .text
            .get(start..end)
            .map(|span| span == link.text)
            .unwrap_or(false);
        if !span_matches {
            return Err(SegmenterError::Metadata(format!(
                "link span {}..{} does not match anchor text {:?} in element {}",
                start, end, link.text, element.id
            )));
        }

        let markdown = format!("[{}]({})", link.text, link.url);
        delta += markdown.len() as isize - link.text.len() as isize;
        element.text.replace_range(start..end, &markdown);
    }

    Ok(())
}
