//! Byte acquisition for input documents, from a local file or over HTTP.
//!
//! Fetched documents are memoized by source string for the lifetime of the
//! process; stale-until-restart is acceptable for these inputs.

use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{InsightError, Result};

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// Fetches a document body over HTTP.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed: reqwest::Url = url.parse().map_err(|e| InsightError::InvalidUrl {
        url: url.to_string(),
        message: format!("{e}"),
    })?;

    let req = Request::new(Method::GET, parsed);
    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Per-process cache of fetched documents, keyed by path or URL.
#[derive(Default)]
pub struct SourceCache {
    entries: HashMap<String, Vec<u8>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document from a local path or over HTTP, returning the cached
    /// copy when the same source was already loaded.
    pub async fn load<C: HttpClient>(&mut self, client: &C, source: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.entries.get(source) {
            debug!(source, "source cache hit");
            return Ok(bytes.clone());
        }

        let bytes = if source.starts_with("http") {
            fetch_bytes(client, source).await?
        } else {
            std::fs::read(source)?
        };

        debug!(source, bytes = bytes.len(), "source loaded");
        self.entries.insert(source.to_string(), bytes.clone());
        Ok(bytes)
    }
}
