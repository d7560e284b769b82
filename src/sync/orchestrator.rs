// src/sync/orchestrator.rs
// =============================================================================
// Runs the whole sync, in this order:
//
// 1. Fetch and print the remote README           (failure: warn, continue)
// 2. Ask for confirmation                         (no: stop, exit 1)
// 3. Extract local instructions, if configured    (failure: warn, continue)
// 4. List the remote directory                    (failure or empty: exit 1)
// 5. Fetch and write each file, one at a time     (failure: warn, next file)
// 6. Print a summary of copied / failed files
//
// Files are processed strictly one after another so only one file's content
// is held in memory at any point.
// =============================================================================

use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::instructions::write_section;
use crate::prompt::Confirmer;
use crate::remote::{Fetcher, Lister, RemoteFileEntry};

pub const CONFIRM_QUESTION: &str = "Continue copying docs to this folder? [y/N]: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Copied,
    Failed(String),
}

/// What happened to one listed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub name: String,
    pub outcome: FileOutcome,
}

impl SyncResult {
    pub fn is_copied(&self) -> bool {
        self.outcome == FileOutcome::Copied
    }
}

/// Per-file outcomes of a sync that got past the listing step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub results: Vec<SyncResult>,
}

impl SyncReport {
    pub fn copied(&self) -> usize {
        self.results.iter().filter(|r| r.is_copied()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.copied()
    }

    /// 0 unless `strict` is set and at least one file failed
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.failed() > 0 {
            1
        } else {
            0
        }
    }
}

pub struct SyncOrchestrator {
    config: SyncConfig,
    fetcher: Box<dyn Fetcher>,
    lister: Box<dyn Lister>,
    confirmer: Box<dyn Confirmer>,
}

impl SyncOrchestrator {
    pub fn new(
        config: SyncConfig,
        fetcher: Box<dyn Fetcher>,
        lister: Box<dyn Lister>,
        confirmer: Box<dyn Confirmer>,
    ) -> Self {
        SyncOrchestrator {
            config,
            fetcher,
            lister,
            confirmer,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs every step. Errors returned here are the fatal ones: the user
    /// said no, or there was no usable listing.
    pub async fn run(&mut self) -> Result<SyncReport> {
        self.show_instructions().await;

        if !self.confirmer.confirm(CONFIRM_QUESTION).await {
            println!("{}", "Aborted by user.".red());
            return Err(SyncError::Declined);
        }

        self.extract_instructions().await;

        println!("{}", "\nFetching docs from remote repo...".cyan());
        let files = match self.list_files().await {
            Ok(files) => files,
            Err(e) => {
                println!("{} {}", "Error fetching docs list:".red(), e);
                return Err(e);
            }
        };

        let mut report = SyncReport::default();
        for entry in &files {
            let outcome = match self.copy_file(entry).await {
                Ok(dest) => {
                    debug!(path = %dest.display(), "written");
                    println!("{}", format!("Copied: {}", entry.name).green());
                    FileOutcome::Copied
                }
                Err(e) => {
                    warn!(file = %entry.name, error = %e, "failed to copy");
                    println!("{}", format!("Failed to copy {}: {}", entry.name, e).red());
                    FileOutcome::Failed(e.to_string())
                }
            };

            report.results.push(SyncResult {
                name: entry.name.clone(),
                outcome,
            });
        }

        print_summary(&report);
        Ok(report)
    }

    async fn show_instructions(&self) {
        let readme = match self.config.readme_url() {
            Ok(url) => self.fetcher.fetch_text(url.as_str()).await,
            Err(e) => Err(e),
        };

        match readme {
            Ok(text) => {
                println!("{}", "\n--- Remote README Instructions ---\n".cyan().bold());
                println!("{}", text.yellow());
                println!("{}", "\n--- End of Instructions ---\n".cyan().bold());
            }
            Err(e) => {
                warn!(error = %e, "could not fetch remote README");
                println!("{} {}", "Could not fetch remote README.md:".red(), e);
            }
        }
    }

    async fn extract_instructions(&self) {
        let Some(extract) = &self.config.extract else {
            return;
        };

        match write_section(extract).await {
            Ok(path) => {
                println!("{}", format!("Wrote instructions: {}", path.display()).green());
            }
            Err(e) => {
                warn!(source = %extract.source.display(), error = %e, "could not extract instructions");
                println!("{} {}", "Could not extract local instructions:".red(), e);
            }
        }
    }

    async fn list_files(&self) -> Result<Vec<RemoteFileEntry>> {
        let url = self.config.listing_url()?;
        let files = self.lister.list_files(url.as_str()).await?;

        if files.is_empty() {
            return Err(SyncError::EmptyListing {
                url: url.to_string(),
            });
        }

        info!(count = files.len(), "listed remote files");
        Ok(files)
    }

    async fn copy_file(&self, entry: &RemoteFileEntry) -> Result<PathBuf> {
        let name = local_name(&entry.name).ok_or_else(|| {
            SyncError::io(
                &entry.name,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a plain file name"),
            )
        })?;

        let url = self
            .config
            .raw_url(&entry.repo_path(&self.config.remote_dir))?;
        let content = self.fetcher.fetch_bytes(url.as_str()).await?;

        tokio::fs::create_dir_all(&self.config.dest_dir)
            .await
            .map_err(|e| SyncError::io(&self.config.dest_dir, e))?;

        let dest = self.config.dest_dir.join(name);
        tokio::fs::write(&dest, &content)
            .await
            .map_err(|e| SyncError::io(&dest, e))?;

        Ok(dest)
    }
}

// Listing names must not climb out of the destination directory
fn local_name(name: &str) -> Option<&str> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    if file_name == name && !name.contains('\\') {
        Some(file_name)
    } else {
        None
    }
}

fn print_summary(report: &SyncReport) {
    let total = report.results.len();

    if report.failed() == 0 {
        println!(
            "{}",
            format!("\nAll {} docs copied successfully!", total).green().bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "\nCopied {} of {} docs, {} failed.",
                report.copied(),
                total,
                report.failed()
            )
            .yellow()
            .bold()
        );
    }
}
