//! Conversation tree data model.
//!
//! DESIGN
//! ======
//! Nodes arrive from the backend either nested (`GET /tree`) or flat
//! (`GET /nodes`). The client never creates a node itself: a snapshot is
//! replaced wholesale on every fetch, so everything here is read-only
//! traversal over `&[Node]` plus an id -> path index rebuilt per snapshot.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;

/// Prompt of the conventional root node that the UI refuses to delete.
pub const PROTECTED_ROOT_PROMPT: &str = "Hi";

/// Number of prompt characters shown in a tree row.
pub const PREVIEW_CHARS: usize = 40;

/// Row label used when a node has no prompt text.
pub const EMPTY_PROMPT_PREVIEW: &str = "(no prompt)";

// =============================================================================
// NODE ID
// =============================================================================

/// Backend-assigned node identifier, stable for the node's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    /// Accepts `12` as well as the displayed `#12` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse::<i64>().map(Self)
    }
}

// =============================================================================
// NODE
// =============================================================================

/// One prompt/response pair in the conversation tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    /// Display-only depth hint; absent on some backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// Condensed context the backend stores for long exchanges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// ISO-8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Node>,
}

impl Node {
    /// Build a childless node. Mostly useful for fixtures and flat listings.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, parent_id: Option<NodeId>, prompt: &str, response: &str) -> Self {
        Self {
            id: id.into(),
            parent_id,
            prompt: prompt.to_owned(),
            response: response.to_owned(),
            depth: None,
            summary: None,
            timestamp: None,
            children: Vec::new(),
        }
    }

    /// Attach children, returning `self` for fixture chaining.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The conventional "Hi" root. Guarded by the client only; the backend
    /// will happily delete it if asked.
    #[must_use]
    pub fn is_protected_root(&self) -> bool {
        self.parent_id.is_none() && self.prompt == PROTECTED_ROOT_PROMPT
    }

    /// Depth for display, `0` when the backend omitted it.
    #[must_use]
    pub fn display_depth(&self) -> u32 {
        self.depth.unwrap_or(0)
    }

    /// Truncated prompt for tree rows. See [`prompt_preview`].
    #[must_use]
    pub fn preview(&self) -> String {
        prompt_preview(&self.prompt)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// TRAVERSAL
// =============================================================================

/// Depth-first search over a forest, parents before children.
///
/// Returns the first node whose id matches, or `None`.
#[must_use]
pub fn find_node_by_id(nodes: &[Node], id: NodeId) -> Option<&Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_by_id(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// First [`PREVIEW_CHARS`] characters of `prompt`, with `...` appended when
/// cut. Empty prompts render as [`EMPTY_PROMPT_PREVIEW`].
#[must_use]
pub fn prompt_preview(prompt: &str) -> String {
    if prompt.is_empty() {
        return EMPTY_PROMPT_PREVIEW.to_owned();
    }
    match prompt.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &prompt[..cut]),
        None => prompt.to_owned(),
    }
}

/// Rebuild a nested forest from a flat, ordered node listing.
///
/// Nodes keep their listing order among siblings. A node whose parent is not
/// in the listing becomes a root. Nodes only reachable through a parent cycle
/// are dropped.
#[must_use]
pub fn forest_from_flat(nodes: Vec<Node>) -> Vec<Node> {
    let present: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let mut by_parent: HashMap<Option<NodeId>, Vec<Node>> = HashMap::new();
    for mut node in nodes {
        node.children.clear();
        let key = node.parent_id.filter(|pid| present.contains(pid));
        by_parent.entry(key).or_default().push(node);
    }
    attach_children(None, &mut by_parent)
}

fn attach_children(parent: Option<NodeId>, by_parent: &mut HashMap<Option<NodeId>, Vec<Node>>) -> Vec<Node> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    for node in &mut level {
        node.children = attach_children(Some(node.id), by_parent);
    }
    level
}

// =============================================================================
// INDEX
// =============================================================================

/// Id -> child-index path into a forest snapshot.
///
/// Rebuilt on every fetch so selection lookups cost O(depth) instead of a full
/// search. Duplicate ids resolve to the same node [`find_node_by_id`] would
/// return.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeIndex {
    paths: HashMap<NodeId, Vec<usize>>,
}

impl NodeIndex {
    #[must_use]
    pub fn build(forest: &[Node]) -> Self {
        let mut index = Self::default();
        let mut path = Vec::new();
        index.visit(forest, &mut path);
        index
    }

    fn visit(&mut self, nodes: &[Node], path: &mut Vec<usize>) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            self.paths.entry(node.id).or_insert_with(|| path.clone());
            self.visit(&node.children, path);
            path.pop();
        }
    }

    /// Resolve `id` against the snapshot this index was built from.
    #[must_use]
    pub fn get<'a>(&self, forest: &'a [Node], id: NodeId) -> Option<&'a Node> {
        let path = self.paths.get(&id)?;
        let (first, rest) = path.split_first()?;
        let mut node = forest.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.paths.contains_key(&id)
    }

    /// Number of distinct ids in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
