// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
//   workflow-sync [OPTIONS]            fetch the docs and copy them here
//   workflow-sync extract [OPTIONS]    only extract the local instructions
//
// Every option can also come from a WORKFLOW_SYNC_* environment variable.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use crate::config::{
    resolve_beside_executable, ExtractConfig, RepoCoordinate, SyncConfig, DEFAULT_API_BASE,
    DEFAULT_RAW_BASE, DEFAULT_REPO,
};
use crate::instructions::ExtractPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "workflow-sync",
    version,
    about = "Fetch workflow docs from a GitHub repository and copy them into this folder",
    long_about = "workflow-sync shows the remote README as instructions, asks for confirmation, \
                  then downloads every file of the remote docs directory into a local folder, \
                  overwriting files with the same name."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub sync: SyncArgs,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output (NO_COLOR is honored too)
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the workflow section of a local document into its own file
    ///
    /// Example: workflow-sync extract --instructions-source ./README.md
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Remote repository as owner/name
    #[arg(long, env = "WORKFLOW_SYNC_REPO", default_value = DEFAULT_REPO, value_parser = parse_repo)]
    pub repo: RepoCoordinate,

    /// Branch (or any git ref) to read from
    #[arg(long, env = "WORKFLOW_SYNC_BRANCH", default_value = "main")]
    pub branch: String,

    /// Remote directory whose files are copied
    #[arg(long, env = "WORKFLOW_SYNC_REMOTE_DIR", default_value = "docs")]
    pub remote_dir: String,

    /// Remote document shown as instructions before asking
    #[arg(long, env = "WORKFLOW_SYNC_README", default_value = "README.md")]
    pub readme: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "WORKFLOW_SYNC_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: Url,

    /// Base URL serving raw file content
    #[arg(long, env = "WORKFLOW_SYNC_RAW_BASE", default_value = DEFAULT_RAW_BASE)]
    pub raw_base: Url,

    /// Local directory the files are written to
    #[arg(long, env = "WORKFLOW_SYNC_DEST", default_value = ".")]
    pub dest: PathBuf,

    /// Skip extracting the local instructions section
    #[arg(long, env = "WORKFLOW_SYNC_NO_EXTRACT")]
    pub no_extract: bool,

    /// Exit with status 1 when any single file failed to copy
    #[arg(long, env = "WORKFLOW_SYNC_STRICT")]
    pub strict: bool,

    #[command(flatten)]
    pub extract: ExtractArgs,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Local document to extract from [default: README.md next to the executable]
    #[arg(long, env = "WORKFLOW_SYNC_INSTRUCTIONS_SOURCE")]
    pub instructions_source: Option<PathBuf>,

    /// Directory the extracted section is written to [default: .windsurf/workflows]
    #[arg(long, env = "WORKFLOW_SYNC_INSTRUCTIONS_DEST")]
    pub instructions_dest: Option<PathBuf>,

    /// File name of the extracted section [default: task-manager-workflow.md]
    #[arg(long, env = "WORKFLOW_SYNC_INSTRUCTIONS_FILE")]
    pub instructions_file: Option<String>,

    /// Line prefix marking the start of the section [default: "## Task Manager Workflow"]
    #[arg(long, env = "WORKFLOW_SYNC_SECTION_MARKER")]
    pub section_marker: Option<String>,

    /// Line prefix introducing the numbered steps [default: "Workflow Summary:"]
    #[arg(long, env = "WORKFLOW_SYNC_SUMMARY_MARKER")]
    pub summary_marker: Option<String>,

    /// Where the extracted section ends
    #[arg(long, env = "WORKFLOW_SYNC_EXTRACT_POLICY", value_enum, default_value_t = ExtractPolicy::Summary)]
    pub extract_policy: ExtractPolicy,
}

impl ExtractArgs {
    pub fn into_config(self) -> ExtractConfig {
        let defaults = ExtractConfig::default();
        let source = self.instructions_source.unwrap_or(defaults.source);

        ExtractConfig {
            source: resolve_beside_executable(&source),
            dest_dir: self.instructions_dest.unwrap_or(defaults.dest_dir),
            file_name: self.instructions_file.unwrap_or(defaults.file_name),
            section_marker: self.section_marker.unwrap_or(defaults.section_marker),
            summary_marker: self.summary_marker.unwrap_or(defaults.summary_marker),
            policy: self.extract_policy,
        }
    }
}

impl SyncArgs {
    pub fn into_config(self) -> SyncConfig {
        let mut config = SyncConfig::new(self.repo, self.api_base, self.raw_base);
        config.branch = self.branch;
        config.remote_dir = self.remote_dir;
        config.readme_path = self.readme;
        config.dest_dir = self.dest;
        config.strict = self.strict;
        config.extract = if self.no_extract {
            None
        } else {
            Some(self.extract.into_config())
        };
        config
    }
}

fn parse_repo(value: &str) -> Result<RepoCoordinate, String> {
    RepoCoordinate::parse(value).ok_or_else(|| format!("expected owner/name, got '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["workflow-sync"]).unwrap();
        assert!(cli.command.is_none());

        let config = cli.sync.into_config();
        assert_eq!(config.repo.to_string(), DEFAULT_REPO);
        assert_eq!(config.branch, "main");
        assert_eq!(config.remote_dir, "docs");
        assert!(!config.strict);

        let extract = config.extract.unwrap();
        assert_eq!(extract.policy, ExtractPolicy::Summary);
        assert!(extract.source.ends_with("README.md"));
    }

    #[test]
    fn test_sync_flags() {
        let cli = Cli::try_parse_from([
            "workflow-sync",
            "--repo",
            "someone/else",
            "--branch",
            "dev",
            "--dest",
            "out",
            "--no-extract",
            "--strict",
        ])
        .unwrap();

        let config = cli.sync.into_config();
        assert_eq!(config.repo.owner, "someone");
        assert_eq!(config.branch, "dev");
        assert_eq!(config.dest_dir, PathBuf::from("out"));
        assert!(config.extract.is_none());
        assert!(config.strict);
    }

    #[test]
    fn test_extract_subcommand() {
        let cli = Cli::try_parse_from([
            "workflow-sync",
            "extract",
            "--instructions-source",
            "/tmp/README.md",
            "--extract-policy",
            "header",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Extract(args)) => {
                let config = args.into_config();
                assert_eq!(config.source, PathBuf::from("/tmp/README.md"));
                assert_eq!(config.policy, ExtractPolicy::Header);
            }
            other => panic!("expected extract, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_repo_is_rejected() {
        assert!(Cli::try_parse_from(["workflow-sync", "--repo", "nope"]).is_err());
    }
}
