// Gist API HTTP client.
// Issues one GET per call, reads the whole body, and decodes it as JSON.

use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{GistError, Result};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Thin wrapper over a configured `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct GistClient {
    client: Client,
}

impl GistClient {
    /// Create a client; `timeout` bounds each whole request.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("gisty"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GistError::Transport)?;

        Ok(Self { client })
    }

    /// Fetch and decode a list page. The status code is not inspected:
    /// whatever body comes back goes to the decoder.
    pub async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.get_json(url, false).await
    }

    /// Fetch and decode a single item; 404 becomes [`GistError::NotFound`].
    pub async fn get_item<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.get_json(url, true).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, not_found_is_error: bool) -> Result<T> {
        // The query carries the token: log only the path and strip the URL from errors.
        let path = url.path().to_string();
        tracing::debug!("GET {}", path);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GistError::Transport(e.without_url()))?;
        let status = response.status();
        // Always drain the body so the connection goes back to the pool.
        let body = response
            .bytes()
            .await
            .map_err(|e| GistError::Transport(e.without_url()))?;
        tracing::debug!("GET {} -> {} ({} bytes)", path, status, body.len());

        if not_found_is_error && status == StatusCode::NOT_FOUND {
            return Err(GistError::NotFound(path));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
