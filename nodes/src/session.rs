//! Session controller: top-level client state and the operations on it.
//!
//! DESIGN
//! ======
//! [`TreeState`] is the whole client state: the last fetched snapshot, the
//! selected id, the loading flag, the message draft and the expand map. The
//! snapshot is only ever replaced, never patched, and selection is an id that
//! is resolved against the current snapshot on every read.
//!
//! [`Session`] owns three seams: a [`TreeApi`] for the backend, a [`Dialogs`]
//! for blocking alert/confirm, and a [`Store`] holding the state. Operations
//! take `&self` and touch the store only inside short synchronous closures,
//! never across an `.await`, so several operations may overlap on one event
//! loop without aliasing the state.
//!
//! CONCURRENCY
//! ===========
//! Overlap is still possible from the user's side (double-clicking send), so
//! two guards apply:
//! - mutations (send, delete branch, clear tree) are serialised by an
//!   in-flight flag; a second mutation is refused with [`SessionError::Busy`];
//! - every fetch carries a generation number and its result is applied only
//!   if no newer fetch started meanwhile.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

use crate::node::{Node, NodeId, NodeIndex};
use crate::view::{Expansion, PanelView, SidebarView, sidebar_view};
use crate::wire::{ApiError, ChatRequest, TreeApi};

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

pub const ALERT_EMPTY_MESSAGE: &str = "Message cannot be empty";
pub const ALERT_NO_SELECTION: &str = "Select a node first";
pub const ALERT_BUSY: &str = "Another request is still in progress";
pub const ALERT_SEND_FAILED: &str = "Failed to send message";
pub const ALERT_SEND_ERROR: &str = "Error sending message";
pub const ALERT_PROTECTED_ROOT: &str = "Cannot delete the root node. It's the starting point of the conversation tree.";
pub const CONFIRM_CLEAR_BRANCH: &str = "Delete this branch and all its children?";
pub const ALERT_BRANCH_DELETED: &str = "Branch deleted";
pub const ALERT_BRANCH_FAILED: &str = "Failed to delete branch";
pub const ALERT_BRANCH_ERROR: &str = "Error deleting branch";
pub const CONFIRM_CLEAR_TREE: &str = "Delete entire tree? This cannot be undone.";
pub const ALERT_TREE_CLEARED: &str = "Tree cleared";
pub const ALERT_TREE_FAILED: &str = "Failed to clear tree";
pub const ALERT_TREE_ERROR: &str = "Error clearing tree";

// =============================================================================
// ERROR
// =============================================================================

/// Why a session operation did not complete.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The draft was empty or whitespace only.
    #[error("message cannot be empty")]
    EmptyMessage,

    /// No node is selected, or the selected id is no longer in the tree.
    #[error("no node selected")]
    NoSelection,

    /// The conventional "Hi" root cannot be deleted from this client.
    #[error("the root node cannot be deleted")]
    ProtectedRoot,

    /// The user declined the confirmation.
    #[error("cancelled by user")]
    Cancelled,

    /// Another mutation is still waiting on the backend.
    #[error("another request is still in progress")]
    Busy,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// STATE
// =============================================================================

/// One fetched forest, shared rather than copied.
///
/// Snapshots are replaced wholesale, never edited, so two snapshots are equal
/// exactly when they are the same allocation. Comparing and cloning are O(1),
/// which keeps reactive consumers from walking the forest on every keystroke.
#[derive(Clone, Debug, Default)]
pub struct Snapshot(Arc<[Node]>);

impl Snapshot {
    #[must_use]
    pub fn new(forest: Vec<Node>) -> Self {
        Self(forest.into())
    }
}

impl Deref for Snapshot {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        &self.0
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Snapshot {}

/// Complete client state.
#[derive(Clone, Debug, Default)]
pub struct TreeState {
    tree: Snapshot,
    index: NodeIndex,
    /// Selected node id. May name a node that no longer exists.
    pub selected: Option<NodeId>,
    /// True while the latest tree fetch is outstanding.
    pub loading: bool,
    /// Draft message for the next branch.
    pub message: String,
    pub expansion: Expansion,
    in_flight: bool,
    fetch_generation: u64,
}

impl TreeState {
    /// Current snapshot: the forest of roots.
    #[must_use]
    pub fn tree(&self) -> &[Node] {
        &self.tree
    }

    /// Shared handle on the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.tree.clone()
    }

    /// Replace the snapshot and rebuild the id index.
    pub fn replace_tree(&mut self, tree: Vec<Node>) {
        self.index = NodeIndex::build(&tree);
        self.tree = Snapshot::new(tree);
    }

    /// True when `id` names a node in the current snapshot.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains(id)
    }

    /// The selected node, resolved against the current snapshot.
    #[must_use]
    pub fn selected_node(&self) -> Option<&Node> {
        self.index.get(&self.tree, self.selected?)
    }

    /// Number of distinct nodes in the snapshot.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// True while a mutation is waiting on the backend.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn sidebar(&self) -> SidebarView {
        sidebar_view(self.loading, &self.tree, &self.expansion, self.selected)
    }

    /// Detail panel for the selection, `None` when nothing resolves.
    #[must_use]
    pub fn panel(&self) -> Option<PanelView> {
        self.selected_node().map(PanelView::from_node)
    }

    /// Start a fetch: raise `loading`, reset expand state (the listing is
    /// rebuilt from scratch) and return this fetch's generation.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.loading = true;
        self.expansion.reset();
        self.fetch_generation
    }

    /// Complete fetch `generation`. Results from superseded fetches are
    /// dropped and leave `loading` to the newer fetch. Returns true when the
    /// snapshot was replaced.
    pub fn finish_fetch(&mut self, generation: u64, tree: Option<Vec<Node>>) -> bool {
        if generation != self.fetch_generation {
            return false;
        }
        self.loading = false;
        match tree {
            Some(tree) => {
                self.replace_tree(tree);
                true
            }
            None => false,
        }
    }

    fn try_begin_mutation(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    fn end_mutation(&mut self) {
        self.in_flight = false;
    }
}

// =============================================================================
// SEAMS
// =============================================================================

/// Interior-mutable home for a [`TreeState`].
///
/// Closures must not re-enter the store.
pub trait Store {
    fn read<R>(&self, f: impl FnOnce(&TreeState) -> R) -> R;
    fn write<R>(&self, f: impl FnOnce(&mut TreeState) -> R) -> R;
}

impl Store for RefCell<TreeState> {
    fn read<R>(&self, f: impl FnOnce(&TreeState) -> R) -> R {
        f(&*self.borrow())
    }

    fn write<R>(&self, f: impl FnOnce(&mut TreeState) -> R) -> R {
        f(&mut *self.borrow_mut())
    }
}

impl<S: Store> Store for Rc<S> {
    fn read<R>(&self, f: impl FnOnce(&TreeState) -> R) -> R {
        (**self).read(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut TreeState) -> R) -> R {
        (**self).write(f)
    }
}

/// Blocking user dialogs.
pub trait Dialogs {
    /// Show `message` and wait for acknowledgement.
    fn alert(&self, message: &str);

    /// Ask a yes/no question; true means proceed.
    fn confirm(&self, message: &str) -> bool;
}

// =============================================================================
// SESSION
// =============================================================================

/// The App controller: every network call and state transition goes through
/// here.
pub struct Session<A, D, S> {
    api: A,
    dialogs: D,
    store: S,
}

/// Releases the in-flight flag when the mutation ends, however it ends.
struct MutationGuard<'a, S: Store> {
    store: &'a S,
}

impl<S: Store> Drop for MutationGuard<'_, S> {
    fn drop(&mut self) {
        self.store.write(TreeState::end_mutation);
    }
}

impl<A: TreeApi, D: Dialogs, S: Store> Session<A, D, S> {
    pub fn new(api: A, dialogs: D, store: S) -> Self {
        Self { api, dialogs, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn select(&self, id: Option<NodeId>) {
        self.store.write(|s| s.selected = id);
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.store.write(|s| s.message = message);
    }

    /// Flip a node's expand state, returning the new state.
    pub fn toggle(&self, id: NodeId) -> bool {
        self.store.write(|s| s.expansion.toggle(id))
    }

    /// Owned copy of the selected node, if it resolves.
    pub fn selected_node(&self) -> Option<Node> {
        self.store.read(|s| s.selected_node().cloned())
    }

    /// `GET /tree` and replace the snapshot.
    ///
    /// Failures are logged and swallowed: the previous snapshot stays. Returns
    /// true when a new snapshot was applied.
    pub async fn fetch_tree(&self) -> bool {
        let generation = self.store.write(TreeState::begin_fetch);
        let fetched = match self.api.fetch_tree().await {
            Ok(tree) => Some(tree),
            Err(error) => {
                tracing::error!(%error, "tree fetch failed");
                None
            }
        };
        let applied = self.store.write(|s| s.finish_fetch(generation, fetched));
        if applied {
            let nodes = self.store.read(TreeState::node_count);
            tracing::debug!(generation, nodes, "tree snapshot replaced");
        }
        applied
    }

    /// Branch from the selected node with the current draft.
    ///
    /// # Errors
    ///
    /// Refuses empty drafts, missing selection and overlapping mutations
    /// without a network call; backend failures keep the draft.
    pub async fn send_message(&self) -> Result<NodeId, SessionError> {
        let (message, parent) = self.store.read(|s| (s.message.clone(), s.selected_node().map(|n| n.id)));
        if message.trim().is_empty() {
            return Err(self.refuse(SessionError::EmptyMessage, ALERT_EMPTY_MESSAGE));
        }
        let Some(parent_id) = parent else {
            return Err(self.refuse(SessionError::NoSelection, ALERT_NO_SELECTION));
        };
        let guard = self.begin_mutation()?;

        let request = ChatRequest { message, parent_id };
        match self.api.send_chat(&request).await {
            Ok(response) => {
                tracing::info!(node_id = %response.node_id, %parent_id, "branch created");
                self.store.write(|s| {
                    s.message.clear();
                    s.selected = Some(response.node_id);
                });
                self.fetch_tree().await;
                drop(guard);
                Ok(response.node_id)
            }
            Err(error) => {
                tracing::error!(%error, %parent_id, "send message failed");
                drop(guard);
                self.dialogs.alert(failure_text(&error, ALERT_SEND_FAILED, ALERT_SEND_ERROR));
                Err(error.into())
            }
        }
    }

    /// Delete the selected node and its descendants after confirmation.
    ///
    /// # Errors
    ///
    /// Refuses the protected root, a missing selection and overlapping
    /// mutations locally; [`SessionError::Cancelled`] when not confirmed.
    pub async fn clear_branch(&self) -> Result<NodeId, SessionError> {
        let target = self.store.read(|s| s.selected_node().map(|n| (n.id, n.is_protected_root())));
        let Some((id, protected)) = target else {
            return Err(self.refuse(SessionError::NoSelection, ALERT_NO_SELECTION));
        };
        if protected {
            return Err(self.refuse(SessionError::ProtectedRoot, ALERT_PROTECTED_ROOT));
        }
        let guard = self.begin_mutation()?;
        if !self.dialogs.confirm(CONFIRM_CLEAR_BRANCH) {
            return Err(SessionError::Cancelled);
        }

        match self.api.clear_branch(id).await {
            Ok(()) => {
                tracing::info!(%id, "branch deleted");
                self.store.write(|s| s.selected = None);
                self.fetch_tree().await;
                drop(guard);
                self.dialogs.alert(ALERT_BRANCH_DELETED);
                Ok(id)
            }
            Err(error) => {
                tracing::error!(%error, %id, "delete branch failed");
                drop(guard);
                self.dialogs.alert(failure_text(&error, ALERT_BRANCH_FAILED, ALERT_BRANCH_ERROR));
                Err(error.into())
            }
        }
    }

    /// Delete the whole forest after confirmation.
    ///
    /// The local snapshot and selection are emptied as soon as the backend
    /// confirms, before the re-fetch resolves.
    ///
    /// # Errors
    ///
    /// [`SessionError::Cancelled`] when not confirmed, [`SessionError::Busy`]
    /// during another mutation, [`SessionError::Api`] on backend failure.
    pub async fn clear_tree(&self) -> Result<(), SessionError> {
        let guard = self.begin_mutation()?;
        if !self.dialogs.confirm(CONFIRM_CLEAR_TREE) {
            return Err(SessionError::Cancelled);
        }

        match self.api.clear_tree().await {
            Ok(()) => {
                tracing::info!("tree cleared");
                self.store.write(|s| {
                    s.replace_tree(Vec::new());
                    s.selected = None;
                });
                self.fetch_tree().await;
                drop(guard);
                self.dialogs.alert(ALERT_TREE_CLEARED);
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "clear tree failed");
                drop(guard);
                self.dialogs.alert(failure_text(&error, ALERT_TREE_FAILED, ALERT_TREE_ERROR));
                Err(error.into())
            }
        }
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_, S>, SessionError> {
        if self.store.write(TreeState::try_begin_mutation) {
            Ok(MutationGuard { store: &self.store })
        } else {
            Err(self.refuse(SessionError::Busy, ALERT_BUSY))
        }
    }

    fn refuse(&self, error: SessionError, alert: &str) -> SessionError {
        tracing::debug!(%error, "operation refused");
        self.dialogs.alert(alert);
        error
    }
}

/// Backend rejections and local/transport failures get different wording.
fn failure_text<'a>(error: &ApiError, rejected: &'a str, errored: &'a str) -> &'a str {
    if error.is_rejection() { rejected } else { errored }
}
