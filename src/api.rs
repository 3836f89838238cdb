//! Native HTTP backend over `reqwest`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements [`TreeApi`] for the terminal client. Every call reads the whole
//! body as text first so failed responses can be turned into an
//! [`ApiError::Status`] carrying the parsed error envelope, and successful
//! ones decoded with `serde_json` into the shared wire types.
//!
//! Timeouts are applied per request: model generation behind `POST /chat`
//! is far slower than a tree listing.

use std::time::Duration;

use nodes::wire::{self, ClearBranchResponse};
use nodes::{ApiError, ChatRequest, ChatResponse, Node, NodeId, TreeApi};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Timeouts};

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

pub struct HttpTreeApi {
    http: reqwest::Client,
    base_url: String,
    timeouts: Timeouts,
}

impl HttpTreeApi {
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect())
            .build()?;
        Ok(Self { http, base_url: config.backend_url.clone(), timeouts: config.timeouts })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /nodes`: every node as a flat list, `children` empty.
    ///
    /// # Errors
    ///
    /// Transport, status and decode failures as [`ApiError`].
    pub async fn fetch_nodes(&self) -> Result<Vec<Node>, ApiError> {
        let request = self.http.get(self.url(wire::NODES_PATH));
        let text = self.send(request, self.timeouts.fetch()).await?;
        decode(&text)
    }

    fn url(&self, path: &str) -> String {
        wire::endpoint(&self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, timeout: Duration) -> Result<String, ApiError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "backend rejected request");
            return Err(ApiError::from_status(status.as_u16(), &text));
        }
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait(?Send)]
impl TreeApi for HttpTreeApi {
    async fn fetch_tree(&self) -> Result<Vec<Node>, ApiError> {
        let request = self.http.get(self.url(wire::TREE_PATH));
        let text = self.send(request, self.timeouts.fetch()).await?;
        wire::decode_forest(&text)
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let builder = self.http.post(self.url(wire::CHAT_PATH)).json(request);
        let text = self.send(builder, self.timeouts.chat()).await?;
        decode(&text)
    }

    async fn clear_branch(&self, id: NodeId) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&wire::clear_branch_path(id)));
        let text = self.send(request, self.timeouts.delete()).await?;
        // Body shape varies between backend versions; it only feeds the log.
        match serde_json::from_str::<ClearBranchResponse>(&text) {
            Ok(body) => tracing::debug!(%id, deleted = body.deleted_ids.len(), "branch delete acknowledged"),
            Err(error) => tracing::debug!(%id, %error, body = %text, "branch delete acknowledged, body not understood"),
        }
        Ok(())
    }

    async fn clear_tree(&self) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(wire::CLEAR_PATH));
        self.send(request, self.timeouts.delete()).await?;
        Ok(())
    }
}
