//! # client
//!
//! Leptos + WASM browser front-end for the AI memory tree.
//!
//! The conversation model and the session controller come from the shared
//! `nodes` crate; this crate supplies the browser halves of its seams
//! (`gloo-net` transport, `window.alert`/`confirm` dialogs, a signal-backed
//! state store) and the components that render the tree and node panel.

pub mod app;
pub mod components;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point: install the panic hook and console logger, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
