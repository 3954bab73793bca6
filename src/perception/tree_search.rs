//! Depth-first lookups over a label's UI subtree.
//!
//! Both searches are pre-order and return the first hit. The host tree is not
//! guaranteed to be acyclic while it is being mutated, so every search keeps a
//! visited set of element addresses and stops descending at
//! `MAX_SEARCH_DEPTH`. Read errors propagate; callers decide whether a broken
//! node skips a label or aborts a lookup.
use std::collections::HashSet;

use crate::errors::HelperResult;
use crate::perception::types::NodeRef;

/// Strongbox labels are a handful of levels deep; anything past this is a
/// corrupted read.
pub const MAX_SEARCH_DEPTH: usize = 64;

/// First element whose text contains `needle`, ignoring case.
pub fn find_by_text(root: Option<&NodeRef>, needle: &str) -> HelperResult<Option<NodeRef>> {
    let needle = needle.to_lowercase();
    find_first(root, &|node: &NodeRef| {
        Ok(node
            .text()?
            .is_some_and(|text| !text.is_empty() && text.to_lowercase().contains(&needle)))
    })
}

/// First element whose texture path equals `asset_id` exactly.
pub fn find_by_asset(root: Option<&NodeRef>, asset_id: &str) -> HelperResult<Option<NodeRef>> {
    find_first(root, &|node: &NodeRef| {
        Ok(node.texture_name()?.is_some_and(|name| name == asset_id))
    })
}

fn find_first<F>(root: Option<&NodeRef>, matches: &F) -> HelperResult<Option<NodeRef>>
where
    F: Fn(&NodeRef) -> HelperResult<bool>,
{
    let Some(root) = root else { return Ok(None) };
    let mut visited = HashSet::new();
    walk(root, matches, 0, &mut visited)
}

fn walk<F>(
    node: &NodeRef,
    matches: &F,
    depth: usize,
    visited: &mut HashSet<usize>,
) -> HelperResult<Option<NodeRef>>
where
    F: Fn(&NodeRef) -> HelperResult<bool>,
{
    if depth > MAX_SEARCH_DEPTH || !visited.insert(node.address()) {
        return Ok(None);
    }

    if matches(node)? {
        return Ok(Some(node.clone()));
    }

    for child in node.children()? {
        if let Some(found) = walk(&child, matches, depth + 1, visited)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
