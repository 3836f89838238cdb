#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use leptos::prelude::*;
use nodes::{Store, TreeState};

/// [`Store`] over a reactive signal.
///
/// Reads are untracked: the controller runs inside spawned tasks, not
/// effects. Writes notify subscribers when the guard drops.
#[derive(Clone, Copy, Debug)]
pub struct SignalStore(pub RwSignal<TreeState>);

impl Store for SignalStore {
    fn read<R>(&self, f: impl FnOnce(&TreeState) -> R) -> R {
        f(&*self.0.read_untracked())
    }

    fn write<R>(&self, f: impl FnOnce(&mut TreeState) -> R) -> R {
        f(&mut *self.0.write())
    }
}
