//! Interactive input collaborators
//!
//! The core never talks to a terminal directly; it goes through the
//! [`Prompter`] capability. The CLI hands in a readline-backed
//! implementation, tests hand in scripted fakes.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::types::{ExecutionError, Result};

/// A single "ask questions" capability, used during authoring and during
/// non-default template resolution.
pub trait Prompter {
    /// Ask for a line of input, pre-filled with `default`. Cancellation
    /// (end-of-input, interrupt) surfaces as an error that aborts the
    /// current operation.
    fn ask(&self, prompt: &str, default: &str) -> Result<String>;

    /// Ask a yes/no question, re-asking until the answer is "y" or "n".
    fn confirm(&self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{prompt} (y/n): "), "")?;
            match answer.trim() {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => continue,
            }
        }
    }
}

/// Readline-backed prompter with line editing and a pre-filled default
#[derive(Debug, Default)]
pub struct ReadlinePrompter;

impl ReadlinePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for ReadlinePrompter {
    fn ask(&self, prompt: &str, default: &str) -> Result<String> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let line = editor.readline_with_initial(prompt, (default, ""))?;
        Ok(line.trim().to_string())
    }
}

/// Run an external fuzzy-finder command over the known snippet titles
///
/// Titles are written to the child's stdin, one per line; the selected
/// title is whatever the child prints to stdout. Returns `None` when the
/// finder exits without selecting anything.
pub async fn filter_titles(filter_cmd: &str, titles: &[String]) -> Result<Option<String>> {
    debug!(filter_cmd = %filter_cmd, candidates = titles.len(), "running fuzzy finder");

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(filter_cmd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| ExecutionError::StartFailed {
            command: filter_cmd.to_string(),
            source: e,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        let input = titles.join("\n");
        // the finder may exit before consuming every title
        let _ = stdin.write_all(input.as_bytes()).await;
    }

    let output = child.wait_with_output().await?;
    let choice = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if choice.is_empty() {
        Ok(None)
    } else {
        Ok(Some(choice))
    }
}
