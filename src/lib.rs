//! Terminal client for the AI memory tree backend.
//!
//! The conversation model, view models and session controller live in the
//! shared `nodes` crate. This crate adds the native pieces around them:
//! validated configuration, a `reqwest` implementation of
//! [`nodes::TreeApi`], a line-oriented [`console::Console`] that doubles as
//! the session's dialogs, and the interactive [`shell`].

pub mod api;
pub mod config;
pub mod console;
pub mod shell;

pub use api::HttpTreeApi;
pub use config::{ClientConfig, ConfigError, ConnectionArgs, Timeouts};
pub use console::Console;
pub use shell::{CommandError, ShellCommand};
