//! Display view models for the tree sidebar and the node panel.
//!
//! DESIGN
//! ======
//! Expand/collapse state lives in an [`Expansion`] map beside the snapshot
//! rather than inside nodes, so collapsing a parent hides its subtree without
//! forgetting how each hidden descendant was left. Unknown ids are expanded.

use std::collections::HashSet;
use std::sync::Arc;

use crate::node::{Node, NodeId};

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

pub const APP_TITLE: &str = "AI Memory Tree Chat";
pub const SIDEBAR_TITLE: &str = "Conversation Tree";
pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TREE_TEXT: &str = "No nodes yet";
pub const NO_SELECTION_TEXT: &str = "Select a node from the tree to view its response or branch from it.";
pub const PROTECTED_ROOT_NOTICE: &str = "This is the root node. It cannot be deleted.";

// =============================================================================
// EXPANSION
// =============================================================================

/// Per-node expand/collapse flags, defaulting to expanded.
///
/// The set is shared copy-on-write: clones are O(1) and compare by pointer
/// first, so an unchanged map costs nothing to diff.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    collapsed: Arc<HashSet<NodeId>>,
}

impl Expansion {
    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        !self.collapsed.contains(&id)
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if self.is_expanded(id) == expanded {
            return;
        }
        let collapsed = Arc::make_mut(&mut self.collapsed);
        if expanded {
            collapsed.remove(&id);
        } else {
            collapsed.insert(id);
        }
    }

    /// Flip `id` and return its new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let expanded = !self.is_expanded(id);
        self.set_expanded(id, expanded);
        expanded
    }

    /// Forget every flag; all nodes read as expanded again.
    pub fn reset(&mut self) {
        if !self.collapsed.is_empty() {
            self.collapsed = Arc::default();
        }
    }
}

// =============================================================================
// TREE ROWS
// =============================================================================

/// One visible line of the tree sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    /// Nesting level from the forest root, not the backend `depth` hint.
    pub depth: usize,
    pub preview: String,
    pub has_children: bool,
    pub expanded: bool,
    /// Set only on the row whose own id is selected.
    pub selected: bool,
}

/// Flatten the forest into the rows currently visible, in display order.
///
/// A collapsed node still yields its own row but none of its descendants.
#[must_use]
pub fn visible_rows(forest: &[Node], expansion: &Expansion, selected: Option<NodeId>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    push_rows(forest, 0, expansion, selected, &mut rows);
    rows
}

fn push_rows(nodes: &[Node], depth: usize, expansion: &Expansion, selected: Option<NodeId>, rows: &mut Vec<TreeRow>) {
    for node in nodes {
        let expanded = expansion.is_expanded(node.id);
        rows.push(TreeRow {
            id: node.id,
            depth,
            preview: node.preview(),
            has_children: node.has_children(),
            expanded,
            selected: selected == Some(node.id),
        });
        if expanded {
            push_rows(&node.children, depth + 1, expansion, selected, rows);
        }
    }
}

/// What the sidebar shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarView {
    Loading,
    Empty,
    Rows(Vec<TreeRow>),
}

/// Sidebar content: the loading flag hides the listing entirely.
#[must_use]
pub fn sidebar_view(loading: bool, forest: &[Node], expansion: &Expansion, selected: Option<NodeId>) -> SidebarView {
    if loading {
        SidebarView::Loading
    } else if forest.is_empty() {
        SidebarView::Empty
    } else {
        SidebarView::Rows(visible_rows(forest, expansion, selected))
    }
}

// =============================================================================
// NODE PANEL
// =============================================================================

/// Which branch-delete affordance the panel offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchAction {
    Delete,
    /// Informational notice instead of a button.
    Protected,
}

/// Detail view of the selected node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub id: NodeId,
    pub depth: u32,
    pub prompt: String,
    pub response: String,
    pub summary: Option<String>,
    pub timestamp: Option<String>,
    pub branch_action: BranchAction,
}

impl PanelView {
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id,
            depth: node.display_depth(),
            prompt: node.prompt.clone(),
            response: node.response.clone(),
            summary: node.summary.clone().filter(|s| !s.trim().is_empty()),
            timestamp: node.timestamp.clone(),
            branch_action: if node.is_protected_root() { BranchAction::Protected } else { BranchAction::Delete },
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Node #{}", self.id)
    }
}
