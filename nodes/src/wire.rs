//! HTTP wire types and the backend seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend exposes `GET /tree`, `POST /chat`, `DELETE /clear/{id}` and
//! `DELETE /clear` (plus `GET /nodes`, a flat listing). Front-ends implement
//! [`TreeApi`] over their HTTP stack (`reqwest` natively, `gloo-net` in the
//! browser); the session controller only ever talks to the trait.
//!
//! ERROR HANDLING
//! ==============
//! Error bodies are never interpreted beyond [`ErrorBody`], a minimal
//! `{"detail": ...}` envelope. Every failure is surfaced identically by the
//! controller, the envelope only enriches logs and messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{Node, NodeId};

#[cfg(test)]
#[path = "wire_test.rs"]
mod tests;

pub const TREE_PATH: &str = "/tree";
pub const NODES_PATH: &str = "/nodes";
pub const CHAT_PATH: &str = "/chat";
pub const CLEAR_PATH: &str = "/clear";

/// Path of the branch-delete endpoint for `id`.
#[must_use]
pub fn clear_branch_path(id: NodeId) -> String {
    format!("{CLEAR_PATH}/{id}")
}

/// Join a backend origin and an endpoint path, tolerating a trailing `/`.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub parent_id: NodeId,
}

/// Reply to `POST /chat`. Only `node_id` is required by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub node_id: NodeId,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub depth: Option<u32>,
}

/// Reply to `DELETE /clear/{id}`. Decoded for logging only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ClearBranchResponse {
    #[serde(default)]
    pub deleted_ids: Vec<NodeId>,
}

/// Decode a `GET /tree` body into the forest of roots.
///
/// Every tree level costs two JSON nesting levels (the node object and its
/// `children` array), so a single long conversation quickly passes
/// `serde_json`'s default depth limit of 128. The limit is lifted here and,
/// on native targets, the stack grows on demand while descending.
///
/// # Errors
///
/// [`ApiError::Decode`] when the body is not a forest of nodes.
pub fn decode_forest(text: &str) -> Result<Vec<Node>, ApiError> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    #[cfg(not(target_arch = "wasm32"))]
    let forest = Vec::<Node>::deserialize(serde_stacker::Deserializer::new(&mut de));
    #[cfg(target_arch = "wasm32")]
    let forest = Vec::<Node>::deserialize(&mut de);
    let forest = forest.map_err(|e| ApiError::Decode(e.to_string()))?;
    de.end().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(forest)
}

// =============================================================================
// ERRORS
// =============================================================================

/// Minimal structured error envelope extracted from a failed response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    /// Extract an envelope from a raw response body.
    ///
    /// `{"detail": "..."}` is used as-is; a non-string `detail` (validation
    /// error lists) is kept as compact JSON; `message`/`error` keys are
    /// accepted as fallbacks; any other non-empty text becomes the detail.
    /// Blank bodies yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let detail = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => ["detail", "message", "error"]
                .iter()
                .find_map(|key| map.get(*key))
                .map_or_else(
                    || text.to_owned(),
                    |value| match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                ),
            _ => text.to_owned(),
        };
        Some(Self { detail })
    }
}

fn detail_suffix(body: Option<&ErrorBody>) -> String {
    body.map(|b| format!(": {}", b.detail)).unwrap_or_default()
}

/// Errors produced by a [`TreeApi`] call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, CORS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned status {status}{}", detail_suffix(.body.as_ref()))]
    Status { status: u16, body: Option<ErrorBody> },

    /// A 2xx response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// No transport is compiled into this build.
    #[error("backend not available in this build")]
    Unavailable,
}

impl ApiError {
    /// Build a status error from a raw body, parsing the envelope.
    #[must_use]
    pub fn from_status(status: u16, raw_body: &str) -> Self {
        Self::Status { status, body: ErrorBody::parse(raw_body) }
    }

    /// HTTP status for [`ApiError::Status`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the request, as opposed to the request
    /// or its decoding failing on this side.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.status().is_some()
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// The four backend operations the controller depends on. Enables mocking in
/// tests.
///
/// Futures are not required to be `Send`: the browser client drives them on
/// the single JS thread.
#[async_trait::async_trait(?Send)]
pub trait TreeApi {
    /// `GET /tree`: the forest of root nodes.
    async fn fetch_tree(&self) -> Result<Vec<Node>, ApiError>;

    /// `POST /chat`: create a node under `request.parent_id`.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// `DELETE /clear/{id}`: remove a node and its descendants.
    async fn clear_branch(&self, id: NodeId) -> Result<(), ApiError>;

    /// `DELETE /clear`: remove the whole forest.
    async fn clear_tree(&self) -> Result<(), ApiError>;
}
