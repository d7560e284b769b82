// src/remote/mod.rs
// =============================================================================
// Talking to the remote repository.
//
// Submodules:
// - fetch: single HTTPS GET returning the body as text
// - listing: directory listing via the GitHub contents API
// =============================================================================

mod fetch;
mod listing;

pub use fetch::{Fetcher, HttpFetcher};
pub use listing::{parse_listing, GithubLister, Lister, RemoteFileEntry};
