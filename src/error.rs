// src/error.rs
// =============================================================================
// Error types for everything that can go wrong while syncing.
//
// Only two failures end the program with a non-zero exit code: the user
// declining the confirmation prompt, and not getting a usable file listing.
// Everything else is logged at the call site and the sync carries on.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// DNS, connection or TLS failure before any HTTP status was received
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200
    #[error("failed to fetch {url} (status {status})")]
    Fetch { url: String, status: u16 },

    /// The listing endpoint returned a body that is not a JSON array of entries
    #[error("could not parse directory listing: {0}")]
    ListingParse(#[from] serde_json::Error),

    /// The listing parsed fine but contained no plain files
    #[error("no files found at {url}")]
    EmptyListing { url: String },

    #[error("section starting with '{marker}' not found")]
    SectionNotFound { marker: String },

    #[error("section starting with '{marker}' is empty")]
    EmptyExtraction { marker: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("aborted by user")]
    Declined,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code for errors that end the program.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
