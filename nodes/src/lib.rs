//! Shared conversation-tree model and session controller.
//!
//! This crate owns everything the terminal client (`memory-tree`) and the
//! browser client (`client`) have in common: the node model returned by the
//! backend, forest traversal, the expand/collapse map, display view models,
//! the HTTP wire types, and the [`session::Session`] controller that drives
//! fetch/send/delete against a [`wire::TreeApi`] implementation.
//!
//! It performs no I/O of its own. Transport, dialogs, and state storage are
//! supplied by the embedding front-end through traits, which keeps the crate
//! usable from both native Tokio code and single-threaded WASM.

pub mod node;
pub mod session;
pub mod view;
pub mod wire;

pub use node::{Node, NodeId, NodeIndex, find_node_by_id, forest_from_flat, prompt_preview};
pub use session::{Dialogs, Session, SessionError, Snapshot, Store, TreeState};
pub use view::{BranchAction, Expansion, PanelView, SidebarView, TreeRow, visible_rows};
pub use wire::{ApiError, ChatRequest, ChatResponse, ErrorBody, TreeApi};
