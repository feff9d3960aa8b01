//! Snippet data model and execution engine
//!
//! A snippet is a titled, ordered sequence of steps. Execution selects a
//! contiguous range of steps, partitions it into maximal runs of equal
//! concurrency flags, and executes sequential runs fail-fast and
//! concurrent runs as a spawn-all/join-all barrier.

pub mod range;
pub mod step;
pub mod store;
pub mod template;

pub use range::StepRange;
pub use step::{Step, TemplateField};
pub use store::SnippetStore;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::prompt::Prompter;
use crate::types::{Error, Result};

/// A named, reusable multi-step shell procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub steps: Vec<Step>,
    #[serde(skip)]
    file_loc: Option<PathBuf>,
}

/// Per-invocation execution configuration, passed explicitly into
/// [`Snippet::execute`]
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Substitute stored defaults for template fields without prompting
    pub use_defaults: bool,
    /// Range expression selecting which steps run ("n", "n-m", "n-");
    /// `None` selects every step
    pub step_range: Option<String>,
}

impl Snippet {
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            steps,
            file_loc: None,
        }
    }

    /// Where this snippet was loaded from or last saved to
    pub fn file_location(&self) -> Option<&Path> {
        self.file_loc.as_deref()
    }

    /// Check structural invariants: a snippet has a non-empty title and
    /// at least one step
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.steps.is_empty() {
            return Err(Error::Validation {
                field: "steps".to_string(),
                message: "a snippet needs at least one step".to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn set_file_location(&mut self, path: PathBuf) {
        self.file_loc = Some(path);
    }

    /// Execute the selected steps of this snippet
    ///
    /// The selected range is split into maximal runs of consecutive steps
    /// sharing the same `execute_concurrent` flag, preserving order.
    /// Sequential runs execute their steps strictly in order and fail
    /// fast. Concurrent runs resolve each step's command on the invoking
    /// task (so prompts appear in step order), launch one task per step,
    /// and wait for all of them; launched siblings are never cancelled,
    /// but a failed run stops the remaining runs.
    ///
    /// Every step's command is resolved immediately before it is launched,
    /// never pre-resolved in bulk.
    pub async fn execute(&self, opts: &ExecuteOptions, prompter: &dyn Prompter) -> Result<()> {
        let expr = opts.step_range.as_deref().unwrap_or("");
        let range = StepRange::parse(expr, self.steps.len())?;

        info!(
            title = %self.title,
            start = range.start,
            end = range.end,
            "executing snippet"
        );

        for run in self.partition_runs(range) {
            if run.concurrent {
                self.execute_concurrent_run(&run, opts, prompter).await?;
            } else {
                self.execute_sequential_run(&run, opts, prompter).await?;
            }
        }

        info!(title = %self.title, "snippet completed");
        Ok(())
    }

    /// Split the selected steps into maximal runs of equal concurrency
    fn partition_runs(&self, range: StepRange) -> Vec<Run<'_>> {
        let mut runs: Vec<Run<'_>> = Vec::new();
        for (offset, step) in self.steps[range.start - 1..range.end].iter().enumerate() {
            let index = range.start + offset;
            match runs.last_mut() {
                Some(run) if run.concurrent == step.execute_concurrent => {
                    run.steps.push((index, step));
                }
                _ => runs.push(Run {
                    concurrent: step.execute_concurrent,
                    steps: vec![(index, step)],
                }),
            }
        }
        runs
    }

    async fn execute_sequential_run(
        &self,
        run: &Run<'_>,
        opts: &ExecuteOptions,
        prompter: &dyn Prompter,
    ) -> Result<()> {
        for (index, step) in &run.steps {
            let resolved = template::resolve(step, opts.use_defaults, prompter)
                .map_err(|e| step_failure(*index, e))?;

            info!(step = index, command = %resolved, "running step");

            match Step::run(&resolved).await {
                Ok(()) => info!(step = index, "step succeeded"),
                Err(e) => {
                    error!(step = index, error = %e, "step failed");
                    return Err(step_failure(*index, e));
                }
            }
        }
        Ok(())
    }

    async fn execute_concurrent_run(
        &self,
        run: &Run<'_>,
        opts: &ExecuteOptions,
        prompter: &dyn Prompter,
    ) -> Result<()> {
        let mut tasks: JoinSet<(usize, Result<()>)> = JoinSet::new();

        // resolve and launch in step order; a resolution failure stops
        // launching but already-launched siblings run to completion
        let mut resolve_failure: Option<Error> = None;
        for (index, step) in &run.steps {
            match template::resolve(step, opts.use_defaults, prompter) {
                Ok(resolved) => {
                    let index = *index;
                    info!(step = index, command = %resolved, "running step");
                    tasks.spawn(async move { (index, Step::run(&resolved).await) });
                }
                Err(e) => {
                    resolve_failure = Some(step_failure(*index, e));
                    break;
                }
            }
        }

        // barrier: wait for every launched step, keep the earliest failure
        let mut first_failure: Option<(usize, Error)> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(()))) => info!(step = index, "step succeeded"),
                Ok((index, Err(e))) => {
                    error!(step = index, error = %e, "step failed");
                    if first_failure.as_ref().map_or(true, |(i, _)| index < *i) {
                        first_failure = Some((index, e));
                    }
                }
                Err(join_error) => {
                    return Err(Error::Application(format!(
                        "step task panicked: {join_error}"
                    )));
                }
            }
        }

        if let Some((index, e)) = first_failure {
            return Err(step_failure(index, e));
        }
        if let Some(e) = resolve_failure {
            return Err(e);
        }
        Ok(())
    }

    /// Author a snippet interactively, one step at a time
    ///
    /// Each step asks for a command (seeded from `seed_commands` when
    /// available), an optional description, the concurrency flag, and a
    /// default value for every `{{field}}` found in the command. The title
    /// is asked last when not already given.
    pub fn author(
        title: Option<String>,
        seed_commands: &[String],
        prompter: &dyn Prompter,
    ) -> Result<Snippet> {
        let mut steps = Vec::new();
        loop {
            let seed = seed_commands
                .get(steps.len())
                .map(String::as_str)
                .unwrap_or("");
            let command = loop {
                let command = prompter.ask(&format!("Step {} command: ", steps.len() + 1), seed)?;
                if !command.is_empty() {
                    break command;
                }
            };
            let description = prompter.ask("Description (optional): ", "")?;
            let concurrent = prompter.confirm("Run concurrently with adjacent concurrent steps?")?;

            let mut fields = Vec::new();
            for name in step::template_fields_of(&command) {
                let default =
                    prompter.ask(&format!("Default value for \"{name}\" (optional): "), "")?;
                fields.push(TemplateField::new(
                    name,
                    (!default.is_empty()).then_some(default),
                ));
            }

            steps.push(Step {
                command,
                description,
                execute_concurrent: concurrent,
                template_fields: fields,
            });

            if !prompter.confirm("Add another step?")? {
                break;
            }
        }

        let title = match title {
            Some(title) if !title.trim().is_empty() => title,
            _ => loop {
                let title = prompter.ask("Title: ", "")?;
                if !title.is_empty() {
                    break title;
                }
            },
        };

        Ok(Snippet::new(title, steps))
    }
}

/// A maximal run of consecutive steps sharing a concurrency flag,
/// with their 1-indexed positions
struct Run<'a> {
    concurrent: bool,
    steps: Vec<(usize, &'a Step)>,
}

fn step_failure(index: usize, source: Error) -> Error {
    Error::Step {
        index,
        source: Box::new(source),
    }
}
