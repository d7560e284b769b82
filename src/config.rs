// src/config.rs
// =============================================================================
// Everything the sync needs to know about where to read from and write to.
//
// The CLI builds one SyncConfig and hands it to the orchestrator. Tests build
// their own pointing at a local mock server and a temp directory.
// =============================================================================

use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Result, SyncError};
use crate::instructions::ExtractPolicy;

pub const DEFAULT_REPO: &str = "edsadr/windsurf-task-manager-workflow";
pub const DEFAULT_API_BASE: &str = "https://api.github.com/";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com/";

/// owner/name pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinate {
    /// Parses "owner/name", tolerating a full github.com URL and a .git suffix.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.")
            .trim_start_matches("github.com/")
            .trim_end_matches('/');

        let mut parts = trimmed.split('/');
        let owner = parts.next()?.trim();
        let name = parts.next()?.trim().trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return None;
        }

        Some(RepoCoordinate {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where the local instructions section is read from and written to.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    pub file_name: String,
    pub section_marker: String,
    pub summary_marker: String,
    pub policy: ExtractPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            source: PathBuf::from("README.md"),
            dest_dir: PathBuf::from(".windsurf/workflows"),
            file_name: "task-manager-workflow.md".to_string(),
            section_marker: "## Task Manager Workflow".to_string(),
            summary_marker: "Workflow Summary:".to_string(),
            policy: ExtractPolicy::Summary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub repo: RepoCoordinate,
    pub branch: String,
    /// Remote directory whose files get copied
    pub remote_dir: String,
    /// Remote document shown as instructions before the prompt
    pub readme_path: String,
    pub api_base: Url,
    pub raw_base: Url,
    pub dest_dir: PathBuf,
    /// None skips the local extraction step
    pub extract: Option<ExtractConfig>,
    /// Exit non-zero when any single file failed to copy
    pub strict: bool,
}

impl SyncConfig {
    pub fn new(repo: RepoCoordinate, api_base: Url, raw_base: Url) -> Self {
        SyncConfig {
            repo,
            branch: "main".to_string(),
            remote_dir: "docs".to_string(),
            readme_path: "README.md".to_string(),
            api_base,
            raw_base,
            dest_dir: PathBuf::from("."),
            extract: None,
            strict: false,
        }
    }

    /// Contents API URL for the remote directory, pinned to the branch
    pub fn listing_url(&self) -> Result<Url> {
        let mut url = with_segments(
            &self.api_base,
            ["repos", self.repo.owner.as_str(), self.repo.name.as_str(), "contents"],
            &self.remote_dir,
        )?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    /// Raw-content URL for a path inside the repository
    pub fn raw_url(&self, path: &str) -> Result<Url> {
        // A branch like "feature/x" spans several segments on the raw host
        with_segments(
            &self.raw_base,
            [self.repo.owner.as_str(), self.repo.name.as_str()],
            &format!("{}/{}", self.branch, path),
        )
    }

    pub fn readme_url(&self) -> Result<Url> {
        self.raw_url(&self.readme_path)
    }
}

// Appends `fixed` and then every '/'-separated part of `path` as separate
// percent-encoded segments, so '#', '?' and '%' in file names stay in the path
fn with_segments<'a>(
    base: &Url,
    fixed: impl IntoIterator<Item = &'a str>,
    path: &str,
) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(fixed)
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// Relative paths are taken relative to the directory holding the executable.
pub fn resolve_beside_executable(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    match std::env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
