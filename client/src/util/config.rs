//! Backend origin discovery.
//!
//! The page may name its backend with
//! `<meta name="memory-tree-backend" content="https://...">`; without one
//! the client talks to the local development server.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const BACKEND_META_NAME: &str = "memory-tree-backend";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend origin for this page.
pub fn backend_url() -> String {
    resolve_backend_url(meta_backend_url().as_deref())
}

/// Normalise a configured origin, falling back to the default when blank.
pub fn resolve_backend_url(configured: Option<&str>) -> String {
    configured
        .map(|raw| raw.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BACKEND_URL)
        .to_owned()
}

fn meta_backend_url() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let document = web_sys::window()?.document()?;
        let selector = format!("meta[name=\"{BACKEND_META_NAME}\"]");
        document.query_selector(&selector).ok()??.get_attribute("content")
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}
