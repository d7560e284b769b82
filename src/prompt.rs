// src/prompt.rs
// =============================================================================
// The yes/no question asked before anything is written to disk.
//
// Only a literal "y" (any case, surrounding whitespace ignored) counts as yes.
// "yes", an empty line, EOF and read errors are all treated as no.
//
// The orchestrator takes any Confirmer, so tests can answer without a
// terminal. Plain closures work too:
//
//   let confirmer = |_question: &str| true;
// =============================================================================

use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::warn;

#[async_trait]
pub trait Confirmer: Send {
    async fn confirm(&mut self, question: &str) -> bool;
}

#[async_trait]
impl<F> Confirmer for F
where
    F: FnMut(&str) -> bool + Send,
{
    async fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Asks on stdout and reads one line from stdin.
///
/// The read runs on tokio's blocking pool. The stdin lock is taken for the
/// single read and dropped right after.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&mut self, question: &str) -> bool {
        let question = question.to_string();
        read_off_runtime(move || ask(io::stdin().lock(), io::stdout().lock(), &question)).await
    }
}

/// Runs a blocking prompt read on the blocking pool; any failure means no.
pub async fn read_off_runtime<F>(read: F) -> bool
where
    F: FnOnce() -> io::Result<bool> + Send + 'static,
{
    match tokio::task::spawn_blocking(read).await {
        Ok(Ok(yes)) => yes,
        Ok(Err(e)) => {
            warn!(error = %e, "could not read confirmation, treating as no");
            false
        }
        Err(e) => {
            warn!(error = %e, "confirmation prompt did not finish, treating as no");
            false
        }
    }
}

/// Writes the question to `output`, reads exactly one line from `input`.
pub fn ask<R: BufRead, W: Write>(mut input: R, mut output: W, question: &str) -> io::Result<bool> {
    write!(output, "{}", question.green().bold())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim().to_lowercase() == "y"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> bool {
        let mut out = Vec::new();
        ask(Cursor::new(input.as_bytes()), &mut out, "Continue? [y/N]: ").unwrap()
    }

    #[test]
    fn test_only_y_is_yes() {
        assert!(answer("y\n"));
        assert!(answer("Y\n"));
        assert!(answer("  y \r\n"));

        assert!(!answer("yes\n"));
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer("yy\n"));
    }

    #[test]
    fn test_eof_is_no() {
        assert!(!answer(""));
    }

    #[test]
    fn test_reads_a_single_line() {
        let mut input = Cursor::new("y\nsecond line\n".as_bytes());
        let mut out = Vec::new();
        assert!(ask(&mut input, &mut out, "?").unwrap());

        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "second line\n");
    }

    #[test]
    fn test_question_is_written() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        ask(Cursor::new("n\n".as_bytes()), &mut out, "Continue? [y/N]: ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Continue? [y/N]: ");
    }

    #[tokio::test]
    async fn test_closure_confirmer() {
        let mut asked = Vec::new();
        let mut confirmer = |q: &str| {
            asked.push(q.to_string());
            false
        };
        assert!(!confirmer.confirm("Proceed?").await);
        assert_eq!(asked, vec!["Proceed?"]);
    }

    #[tokio::test]
    async fn test_blocking_read_result_is_returned() {
        let yes = read_off_runtime(|| ask(Cursor::new(b"y\n".to_vec()), io::sink(), "?")).await;
        assert!(yes);

        let no = read_off_runtime(|| ask(Cursor::new(b"nope\n".to_vec()), io::sink(), "?")).await;
        assert!(!no);
    }

    #[tokio::test]
    async fn test_read_error_is_no() {
        let answer = read_off_runtime(|| Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))).await;
        assert!(!answer);
    }
}
