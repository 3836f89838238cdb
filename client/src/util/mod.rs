//! Browser helpers: backend discovery and native dialogs.

pub mod config;
pub mod dialogs;
