//! Title-bounded element grouping.
//!
//! Elements between Title elements form one semantic unit, giving the
//! splitter a guaranteed semantic boundary to exploit.

use crate::types::{Element, ElementGroup};

/// Partition the element sequence into title-bounded groups.
///
/// Every Title opens a new group owning all following non-Title elements.
/// Elements before the first Title form an untitled group. Adjacent Titles
/// produce a titled group with no nodes, preserved so the title itself still
/// flows downstream. An input with no Title yields one untitled group.
///
/// Flattening the groups (title first, then nodes) reproduces the original
/// element order exactly.
pub fn group_elements(elements: Vec<Element>) -> Vec<ElementGroup> {
    let mut groups: Vec<ElementGroup> = Vec::new();
    let mut current = ElementGroup::untitled();

    for element in elements {
        if element.is_title() {
            if !current.is_empty() {
                groups.push(current);
            }
            current = ElementGroup::titled(element);
        } else {
            current.nodes.push(element);
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
