// src/remote/listing.rs
// =============================================================================
// Lists the files inside a remote repository directory.
//
// Uses the GitHub contents API, which answers with a JSON array like:
//
//   [
//     { "name": "plan.md", "path": "docs/plan.md", "type": "file", ... },
//     { "name": "img",     "path": "docs/img",     "type": "dir",  ... }
//   ]
//
// Only plain files are kept. Subdirectories are dropped, we never descend.
// =============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::fetch::Fetcher;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    #[serde(rename = "dir", alias = "directory")]
    Directory,
    /// symlink, submodule and whatever else the API grows
    #[serde(other)]
    Other,
}

/// One entry of the listing response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Path inside the repository; used to build the raw-content URL
    #[serde(default)]
    pub path: Option<String>,
}

impl RemoteFileEntry {
    /// Repository path of the entry, falling back to `<dir>/<name>`.
    pub fn repo_path(&self, dir: &str) -> String {
        match &self.path {
            Some(path) if !path.is_empty() => path.clone(),
            _ => {
                let dir = dir.trim_matches('/');
                if dir.is_empty() {
                    self.name.clone()
                } else {
                    format!("{}/{}", dir, self.name)
                }
            }
        }
    }
}

#[async_trait]
pub trait Lister: Send + Sync {
    /// Plain files at `listing_url`, in the order the endpoint returned them.
    async fn list_files(&self, listing_url: &str) -> Result<Vec<RemoteFileEntry>>;
}

/// Lister that fetches the contents API response and parses it
pub struct GithubLister<F> {
    fetcher: F,
}

impl<F: Fetcher> GithubLister<F> {
    pub fn new(fetcher: F) -> Self {
        GithubLister { fetcher }
    }
}

#[async_trait]
impl<F: Fetcher> Lister for GithubLister<F> {
    async fn list_files(&self, listing_url: &str) -> Result<Vec<RemoteFileEntry>> {
        let body = self.fetcher.fetch_text(listing_url).await?;
        let files = parse_listing(&body)?;
        debug!(url = listing_url, files = files.len(), "listed");
        Ok(files)
    }
}

/// Parses a listing body and keeps only the `file` entries, order preserved.
pub fn parse_listing(body: &str) -> Result<Vec<RemoteFileEntry>> {
    let entries: Vec<RemoteFileEntry> = serde_json::from_str(body)?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .collect())
}
