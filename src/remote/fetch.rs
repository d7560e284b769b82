// src/remote/fetch.rs
// =============================================================================
// Downloads a single remote file.
//
// One GET, one attempt. No timeout and no retry: a slow server just makes the
// sync slow, and a failed file is reported by the caller and skipped.
//
// The Fetcher trait is the seam tests use to hand back canned content
// without touching the network.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{Result, SyncError};

// The GitHub contents API rejects requests that carry no User-Agent
pub const USER_AGENT: &str = concat!("workflow-sync/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the full response body byte for byte, or an error for
    /// transport failures and any status other than 200.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Body decoded as UTF-8, invalid sequences replaced. For documents
    /// that are displayed or parsed, never for files written to disk.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let body = self.fetch_bytes(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(SyncError::Client)?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET");

        let transport = |source| SyncError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        if response.status() != StatusCode::OK {
            return Err(SyncError::Fetch {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}
