use regex::Regex;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::types::{ExecutionError, Result};

/// A template field declared by a step, optionally carrying a default
/// value recorded during authoring. Serialized either as a bare name or
/// as an object with a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TemplateField {
    Name(String),
    WithDefault {
        name: String,
        #[serde(default)]
        default: String,
    },
}

impl TemplateField {
    pub fn new(name: impl Into<String>, default: Option<String>) -> Self {
        match default {
            Some(default) if !default.is_empty() => Self::WithDefault {
                name: name.into(),
                default,
            },
            _ => Self::Name(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::WithDefault { name, .. } => name,
        }
    }

    /// Stored default value, empty string if none was recorded
    pub fn default_value(&self) -> &str {
        match self {
            Self::Name(_) => "",
            Self::WithDefault { default, .. } => default,
        }
    }
}

/// One unit of a snippet: a compound command plus metadata
///
/// `command` may contain `&&`-joined sub-commands and `{{field}}`
/// placeholders. `template_fields` lists the distinct fields referenced by
/// the command, in first-occurrence order; every listed name must occur as
/// a placeholder in the command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub command: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub execute_concurrent: bool,
    #[serde(default)]
    pub template_fields: Vec<TemplateField>,
}

impl Step {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: String::new(),
            execute_concurrent: false,
            template_fields: Vec::new(),
        }
    }

    /// Run a fully resolved compound command line
    ///
    /// The line is split on the literal `&&` delimiter; each segment is
    /// whitespace-tokenized into a program and its arguments and run with
    /// inherited stdio, strictly in order. The first segment that fails to
    /// start or exits non-zero aborts the step; remaining segments are
    /// skipped.
    ///
    /// Known limitation: segments are tokenized on whitespace with no
    /// shell quoting support, so quoted arguments containing spaces are
    /// mis-tokenized.
    pub async fn run(resolved_command: &str) -> Result<()> {
        for segment in resolved_command.split("&&") {
            let segment = segment.trim();
            let mut tokens = segment.split_whitespace();
            let program = tokens.next().ok_or(ExecutionError::EmptyCommand)?;

            debug!(command = %segment, "running command segment");

            let status = Command::new(program)
                .args(tokens)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(|e| ExecutionError::StartFailed {
                    command: segment.to_string(),
                    source: e,
                })?;

            if !status.success() {
                return Err(match status.code() {
                    Some(code) => ExecutionError::NonZeroExit {
                        command: segment.to_string(),
                        code,
                    },
                    None => ExecutionError::Terminated {
                        command: segment.to_string(),
                    },
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Extract the distinct `{{field}}` names referenced by a command, in
/// first-occurrence order
pub fn template_fields_of(command: &str) -> Vec<String> {
    let placeholder =
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_-]*)\s*\}\}").expect("placeholder regex");

    let mut names = Vec::new();
    for capture in placeholder.captures_iter(command) {
        let name = capture[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
