//! UI components for the tree sidebar and node panel.

pub mod node_panel;
pub mod tree_display;
pub mod tree_node;
