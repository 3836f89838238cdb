//! Client-side state.
//!
//! DESIGN
//! ======
//! The whole tree state is one `RwSignal<TreeState>`. Components read it
//! reactively; the session controller reads and writes it through
//! [`tree::SignalStore`].

pub mod tree;
