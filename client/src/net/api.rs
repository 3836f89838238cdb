//! Backend calls over `gloo-net`.
//!
//! Client-side (csr): real HTTP calls via the browser `fetch` API.
//! Native builds (tests, `cargo check` without the feature): every call
//! fails with [`ApiError::Unavailable`] since there is no browser to ask.
//!
//! ERROR HANDLING
//! ==============
//! Network failures (including CORS rejections, which the browser reports
//! as opaque network errors) map to [`ApiError::Transport`]; non-2xx
//! answers carry their status and parsed error envelope.

#![allow(clippy::unused_async)]

use nodes::{ApiError, ChatRequest, ChatResponse, Node, NodeId, TreeApi};

#[cfg(feature = "csr")]
use nodes::wire;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

/// [`TreeApi`] against one backend origin.
#[derive(Clone, Debug)]
pub struct GlooTreeApi {
    base_url: String,
}

impl GlooTreeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "csr")]
mod http {
    use gloo_net::http::Response;
    use nodes::ApiError;
    use serde::de::DeserializeOwned;

    pub fn transport(error: gloo_net::Error) -> ApiError {
        ApiError::Transport(error.to_string())
    }

    /// Turn a non-2xx response into a status error, keeping its body.
    pub async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::debug!("backend rejected request: {status} {body}");
        Err(ApiError::from_status(status, &body))
    }

    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Nested forests can be deeper than `Response::json` will parse.
    pub async fn decode_forest(response: Response) -> Result<Vec<nodes::Node>, ApiError> {
        let text = response.text().await.map_err(transport)?;
        nodes::wire::decode_forest(&text)
    }
}

#[async_trait::async_trait(?Send)]
impl TreeApi for GlooTreeApi {
    async fn fetch_tree(&self) -> Result<Vec<Node>, ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = wire::endpoint(&self.base_url, wire::TREE_PATH);
            let response = gloo_net::http::Request::get(&url).send().await.map_err(http::transport)?;
            http::decode_forest(http::ensure_ok(response).await?).await
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = wire::endpoint(&self.base_url, wire::CHAT_PATH);
            let response = gloo_net::http::Request::post(&url)
                .json(request)
                .map_err(http::transport)?
                .send()
                .await
                .map_err(http::transport)?;
            http::decode(http::ensure_ok(response).await?).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }

    async fn clear_branch(&self, id: NodeId) -> Result<(), ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = wire::endpoint(&self.base_url, &wire::clear_branch_path(id));
            let response = gloo_net::http::Request::delete(&url).send().await.map_err(http::transport)?;
            http::ensure_ok(response).await?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = id;
            Err(ApiError::Unavailable)
        }
    }

    async fn clear_tree(&self) -> Result<(), ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = wire::endpoint(&self.base_url, wire::CLEAR_PATH);
            let response = gloo_net::http::Request::delete(&url).send().await.map_err(http::transport)?;
            http::ensure_ok(response).await?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ApiError::Unavailable)
        }
    }
}
