// src/instructions/extract.rs
// =============================================================================
// Pulls one section out of a local markdown document and saves it as its own
// file.
//
// The section starts at the first line beginning with the section marker.
// Where it ends depends on the policy:
//
//   Summary (default)
//     If a "Workflow Summary:" line follows the start, the section runs past
//     it, through the numbered steps right after it (each step may carry
//     indented continuation lines), then through any blank or indented lines
//     that trail the steps. The first non-indented line after that ends it.
//     Without a summary line this falls back to the Header rule.
//
//   Header
//     The section ends at the next top-level header ("# " or "## "), or at
//     the end of the document.
//
// Example (Summary policy):
//
//   ## Task Manager Workflow      <- start
//   Workflow Summary:
//   1. Plan the task
//   2. Build it
//
//       cargo test                <- trailing indented block, kept
//
//   Something else                <- end (excluded)
// =============================================================================

use clap::ValueEnum;
use std::path::PathBuf;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractPolicy {
    /// Stop after the numbered steps following the summary line
    #[default]
    Summary,
    /// Stop at the next top-level header
    Header,
}

/// Returns the trimmed text of the section that starts with `section_marker`.
pub fn extract_section(
    text: &str,
    section_marker: &str,
    summary_marker: &str,
    policy: ExtractPolicy,
) -> Result<String> {
    // lines() strips both "\n" and "\r\n"
    let lines: Vec<&str> = text.lines().collect();

    let start = lines
        .iter()
        .position(|line| line.trim().starts_with(section_marker))
        .ok_or_else(|| SyncError::SectionNotFound {
            marker: section_marker.to_string(),
        })?;

    let end = match policy {
        ExtractPolicy::Summary => summary_end(&lines, start, summary_marker)
            .unwrap_or_else(|| header_end(&lines, start)),
        ExtractPolicy::Header => header_end(&lines, start),
    };

    let section = lines[start..end].join("\n").trim().to_string();
    if section.is_empty() {
        return Err(SyncError::EmptyExtraction {
            marker: section_marker.to_string(),
        });
    }

    Ok(section)
}

/// Reads `config.source`, extracts the section and writes it to
/// `config.dest_dir/config.file_name`. Nothing is written on failure.
pub async fn write_section(config: &ExtractConfig) -> Result<PathBuf> {
    let text = tokio::fs::read_to_string(&config.source)
        .await
        .map_err(|e| SyncError::io(&config.source, e))?;

    let section = extract_section(
        &text,
        &config.section_marker,
        &config.summary_marker,
        config.policy,
    )?;

    tokio::fs::create_dir_all(&config.dest_dir)
        .await
        .map_err(|e| SyncError::io(&config.dest_dir, e))?;

    let dest = config.dest_dir.join(&config.file_name);
    tokio::fs::write(&dest, section.as_bytes())
        .await
        .map_err(|e| SyncError::io(&dest, e))?;

    debug!(path = %dest.display(), bytes = section.len(), "wrote instructions");
    Ok(dest)
}

fn summary_end(lines: &[&str], start: usize, summary_marker: &str) -> Option<usize> {
    let summary = lines[start + 1..]
        .iter()
        .position(|line| line.trim().starts_with(summary_marker))?
        + start
        + 1;

    let after_summary = summary + 1;
    let mut i = after_summary;

    // Allow blank lines between the summary line and the first step
    while i < lines.len() && is_blank(lines[i]) {
        i += 1;
    }
    if i >= lines.len() || !is_numbered(lines[i]) {
        i = after_summary;
    }

    // The numbered steps, each possibly followed by indented continuation
    while i < lines.len() && (is_numbered(lines[i]) || is_indented(lines[i])) {
        i += 1;
    }

    // Whatever trails the steps: blank lines and indented blocks
    while i < lines.len() && (is_blank(lines[i]) || is_indented(lines[i])) {
        i += 1;
    }

    Some(i)
}

fn header_end(lines: &[&str], start: usize) -> usize {
    (start + 1..lines.len())
        .find(|&i| is_top_level_header(lines[i]))
        .unwrap_or(lines.len())
}

fn is_top_level_header(line: &str) -> bool {
    line.starts_with("# ") || line.starts_with("## ")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    !is_blank(line) && (line.starts_with(' ') || line.starts_with('\t'))
}

// "12. Something" -> true, "1) x" / "v1.2" -> false. Not trimmed: "  3. nested"
// is false here and counts as an indented continuation line instead
fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "## Task Manager Workflow";
    const SUMMARY: &str = "Workflow Summary:";

    fn extract(text: &str, policy: ExtractPolicy) -> Result<String> {
        extract_section(text, MARKER, SUMMARY, policy)
    }

    const WITH_SUMMARY: &str = "\
# Project

Intro text.

## Task Manager Workflow
Workflow Summary:
1. Create a plan in docs/plan.md
2. Break the plan into tasks
3. Work through the tasks one by one

    /plan
    /next-task

After the steps, unrelated prose.

## Installation
Run it.
";

    #[test]
    fn test_summary_policy_stops_after_indented_block() {
        let section = extract(WITH_SUMMARY, ExtractPolicy::Summary).unwrap();
        assert_eq!(
            section,
            "## Task Manager Workflow\n\
             Workflow Summary:\n\
             1. Create a plan in docs/plan.md\n\
             2. Break the plan into tasks\n\
             3. Work through the tasks one by one\n\
             \n    /plan\n    /next-task"
        );
        assert!(!section.contains("unrelated prose"));
    }

    #[test]
    fn test_header_policy_runs_to_next_header() {
        let section = extract(WITH_SUMMARY, ExtractPolicy::Header).unwrap();
        assert!(section.starts_with(MARKER));
        assert!(section.ends_with("After the steps, unrelated prose."));
        assert!(!section.contains("Installation"));
    }

    #[test]
    fn test_adjacent_header_yields_only_marker_line() {
        let text = "## Task Manager Workflow\n## Next Section\nbody\n";
        assert_eq!(extract(text, ExtractPolicy::Summary).unwrap(), MARKER);
        assert_eq!(extract(text, ExtractPolicy::Header).unwrap(), MARKER);
    }

    #[test]
    fn test_without_summary_falls_back_to_header_rule() {
        let text = "## Task Manager Workflow\nStep one.\n\nStep two.\n# Other\n";
        assert_eq!(
            extract(text, ExtractPolicy::Summary).unwrap(),
            "## Task Manager Workflow\nStep one.\n\nStep two."
        );
    }

    #[test]
    fn test_section_runs_to_end_of_document() {
        let text = "intro\n  ## Task Manager Workflow  \nlast line\n\n";
        assert_eq!(
            extract(text, ExtractPolicy::Header).unwrap(),
            "## Task Manager Workflow  \nlast line"
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "## Task Manager Workflow\r\nWorkflow Summary:\r\n1. One\r\n2. Two\r\nTail\r\n";
        assert_eq!(
            extract(text, ExtractPolicy::Summary).unwrap(),
            "## Task Manager Workflow\nWorkflow Summary:\n1. One\n2. Two"
        );
    }

    #[test]
    fn test_blank_line_before_first_step() {
        let text = "## Task Manager Workflow\nWorkflow Summary:\n\n1. One\n2. Two\n\nTail\n";
        assert_eq!(
            extract(text, ExtractPolicy::Summary).unwrap(),
            "## Task Manager Workflow\nWorkflow Summary:\n\n1. One\n2. Two"
        );
    }

    #[test]
    fn test_indented_numbered_line_is_a_continuation() {
        let text = "## Task Manager Workflow\nWorkflow Summary:\n1. One\n   2. nested\n3. Three\nTail\n";
        assert_eq!(
            extract(text, ExtractPolicy::Summary).unwrap(),
            "## Task Manager Workflow\nWorkflow Summary:\n1. One\n   2. nested\n3. Three"
        );
    }

    #[test]
    fn test_missing_marker_is_section_not_found() {
        let err = extract("# Readme\nNothing here.\n", ExtractPolicy::Summary).unwrap_err();
        assert!(matches!(err, SyncError::SectionNotFound { .. }));
    }

    #[test]
    fn test_empty_marker_on_blank_document_is_empty_extraction() {
        let err = extract_section("\n   \n", "", SUMMARY, ExtractPolicy::Header).unwrap_err();
        assert!(matches!(err, SyncError::EmptyExtraction { .. }));
    }

    #[test]
    fn test_is_numbered() {
        assert!(is_numbered("1. one"));
        assert!(is_numbered("12.twelve"));
        assert!(!is_numbered("1) one"));
        assert!(!is_numbered("  3. nested"));
        assert!(!is_numbered("step 1."));
    }

    fn extract_config(dir: &TempDir, readme: &str) -> ExtractConfig {
        let source = dir.path().join("README.md");
        std::fs::write(&source, readme).unwrap();
        ExtractConfig {
            source,
            dest_dir: dir.path().join(".windsurf").join("workflows"),
            ..ExtractConfig::default()
        }
    }

    #[tokio::test]
    async fn test_write_section_creates_dir_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let config = extract_config(&dir, WITH_SUMMARY);

        std::fs::create_dir_all(&config.dest_dir).unwrap();
        std::fs::write(config.dest_dir.join(&config.file_name), "stale").unwrap();

        let written = write_section(&config).await.unwrap();
        let content = std::fs::read_to_string(&written).unwrap();

        assert_eq!(written, config.dest_dir.join("task-manager-workflow.md"));
        assert!(content.starts_with(MARKER));
        assert!(content.ends_with("    /next-task"));
    }

    #[tokio::test]
    async fn test_write_section_missing_marker_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = extract_config(&dir, "# Readme\nNo workflow section.\n");

        let err = write_section(&config).await.unwrap_err();

        assert!(matches!(err, SyncError::SectionNotFound { .. }));
        assert!(!config.dest_dir.exists());
    }

    #[tokio::test]
    async fn test_write_section_missing_source_is_io_error() {
        let dir = TempDir::new().unwrap();
        let config = ExtractConfig {
            source: dir.path().join("nope.md"),
            dest_dir: dir.path().join("out"),
            ..ExtractConfig::default()
        };

        let err = write_section(&config).await.unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
