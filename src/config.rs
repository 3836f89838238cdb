//! Terminal client configuration from flags and environment variables.

use std::time::Duration;

use clap::Args;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Backend origin is not an absolute http(s) URL.
    #[error("invalid backend URL '{0}' (expected http://host[:port] or https://...)")]
    InvalidBackendUrl(String),

    /// A timeout of zero would fail every request.
    #[error("{0} must be at least one second")]
    ZeroTimeout(&'static str),
}

/// Per-request timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub fetch_secs: u64,
    /// `POST /chat` waits on model generation, so it gets the longest budget.
    pub chat_secs: u64,
    pub delete_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            fetch_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            chat_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            delete_secs: DEFAULT_DELETE_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch_secs)
    }

    #[must_use]
    pub fn chat(&self) -> Duration {
        Duration::from_secs(self.chat_secs)
    }

    #[must_use]
    pub fn delete(&self) -> Duration {
        Duration::from_secs(self.delete_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let named = [
            ("fetch timeout", self.fetch_secs),
            ("chat timeout", self.chat_secs),
            ("delete timeout", self.delete_secs),
            ("connect timeout", self.connect_secs),
        ];
        match named.iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(ConfigError::ZeroTimeout(name)),
            None => Ok(self),
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing `/`.
    pub backend_url: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Rejects non-http(s) origins and zero timeouts.
    pub fn new(backend_url: &str, timeouts: Timeouts) -> Result<Self, ConfigError> {
        let backend_url = normalize_backend_url(backend_url)?;
        let timeouts = timeouts.validate()?;
        Ok(Self { backend_url, timeouts })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { backend_url: DEFAULT_BACKEND_URL.to_owned(), timeouts: Timeouts::default() }
    }
}

fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidBackendUrl(raw.to_owned()))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') || rest.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidBackendUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

// =============================================================================
// FLAGS
// =============================================================================

/// Backend connection flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Backend origin serving /tree, /chat and /clear.
    #[arg(long, env = "MEMORY_TREE_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    #[arg(long, env = "MEMORY_TREE_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    #[arg(long, env = "MEMORY_TREE_CHAT_TIMEOUT_SECS", default_value_t = DEFAULT_CHAT_TIMEOUT_SECS)]
    pub chat_timeout_secs: u64,

    #[arg(long, env = "MEMORY_TREE_DELETE_TIMEOUT_SECS", default_value_t = DEFAULT_DELETE_TIMEOUT_SECS)]
    pub delete_timeout_secs: u64,

    #[arg(long, env = "MEMORY_TREE_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,
}

impl ConnectionArgs {
    /// # Errors
    ///
    /// See [`ClientConfig::new`].
    pub fn into_config(self) -> Result<ClientConfig, ConfigError> {
        let timeouts = Timeouts {
            fetch_secs: self.fetch_timeout_secs,
            chat_secs: self.chat_timeout_secs,
            delete_secs: self.delete_timeout_secs,
            connect_secs: self.connect_timeout_secs,
        };
        ClientConfig::new(&self.backend_url, timeouts)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
