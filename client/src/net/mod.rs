//! Network layer: the browser implementation of the backend seam.

pub mod api;
