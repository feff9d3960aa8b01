use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::prompt::{self, ReadlinePrompter};
use crate::snippet::{ExecuteOptions, Snippet, SnippetStore};
use crate::types::{Error, Result};

#[derive(Parser)]
#[command(name = "snipkit")]
#[command(about = "Record multi-step shell procedures and replay them later")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the snippets directory
    #[arg(long)]
    pub snippets_dir: Option<PathBuf>,

    /// Override log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Execute a snippet
    Exec(ExecArgs),
    /// Record a new snippet interactively
    New(NewArgs),
    /// List all snippet titles
    List,
    /// Remove a snippet
    Remove(RemoveArgs),
}

#[derive(Args, Clone)]
pub struct ExecArgs {
    /// Snippet title; omit to select interactively via the configured
    /// fuzzy finder
    pub title: Option<String>,

    /// Select a single step with "-s <step>" or a range with
    /// "-s <start>-<end>" (end is optional)
    #[arg(short = 's', long = "step")]
    pub step: Option<String>,

    /// Use the stored default values for template fields instead of
    /// being asked for a value
    #[arg(long)]
    pub use_default: bool,
}

#[derive(Args, Clone)]
pub struct NewArgs {
    /// Snippet title; asked interactively when omitted
    #[arg(short, long)]
    pub title: Option<String>,

    /// Seed commands offered as defaults for the first steps
    pub commands: Vec<String>,
}

#[derive(Args, Clone)]
pub struct RemoveArgs {
    /// Title of the snippet to remove
    pub title: String,
}

impl Cli {
    /// Get effective log level considering verbose/quiet flags
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            return Some(crate::logging::level::DEBUG);
        }
        if self.quiet {
            return Some(crate::logging::level::ERROR);
        }
        self.log_level.as_ref().map(|level| match level {
            LogLevel::Trace => crate::logging::level::TRACE,
            LogLevel::Debug => crate::logging::level::DEBUG,
            LogLevel::Info => crate::logging::level::INFO,
            LogLevel::Warn => crate::logging::level::WARN,
            LogLevel::Error => crate::logging::level::ERROR,
        })
    }

    /// Load configuration: an explicit --config path must exist, the
    /// default path falls back to defaults when absent
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_file(path),
            None => Config::load_or_default(crate::config::default_config_path()),
        }
    }

    /// The snippets directory, CLI flag taking precedence over config
    pub fn snippets_dir(&self, config: &Config) -> PathBuf {
        self.snippets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.storage.snippets_dir))
    }
}

/// Fold a fuzzy-finder outcome into a title, treating both non-selection
/// and finder failure as a missing title
fn title_from_selection(selection: Result<Option<String>>) -> Result<String> {
    match selection {
        Ok(Some(title)) => Ok(title),
        Ok(None) => Err(Error::MissingSnippetTitle),
        Err(e) => {
            warn!(error = %e, "fuzzy finder failed");
            Err(Error::MissingSnippetTitle)
        }
    }
}

/// Execute a snippet, resolving the title interactively when omitted
pub async fn exec_snippet(config: &Config, store: &SnippetStore, args: ExecArgs) -> Result<()> {
    let title = match args.title {
        Some(title) => title,
        None => {
            let titles = store.titles()?;
            match &config.finder.filter_cmd {
                Some(filter_cmd) => {
                    title_from_selection(prompt::filter_titles(filter_cmd, &titles).await)?
                }
                None => return Err(Error::MissingSnippetTitle),
            }
        }
    };

    let snippet = store.find(&title)?;
    let opts = ExecuteOptions {
        use_defaults: args.use_default,
        step_range: args.step,
    };

    snippet.execute(&opts, &ReadlinePrompter::new()).await
}

/// Record a new snippet interactively and save it
pub fn new_snippet(store: &SnippetStore, args: NewArgs) -> Result<()> {
    let prompter = ReadlinePrompter::new();
    let mut snippet = Snippet::author(args.title, &args.commands, &prompter)?;
    store.save(&mut snippet)?;

    info!(title = %snippet.title, steps = snippet.steps.len(), "snippet recorded");
    Ok(())
}

/// Print every snippet title with its step count
pub fn list_snippets(store: &SnippetStore) -> Result<()> {
    for snippet in store.load_all()? {
        println!("{} ({} steps)", snippet.title, snippet.steps.len());
    }
    Ok(())
}

/// Remove a snippet from the store
pub fn remove_snippet(store: &SnippetStore, args: RemoveArgs) -> Result<()> {
    store.remove(&args.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_exec_flags() {
        let cli = Cli::parse_from(["snipkit", "exec", "deploy app", "-s", "2-4", "--use-default"]);
        match cli.command {
            Commands::Exec(args) => {
                assert_eq!(args.title, Some("deploy app".to_string()));
                assert_eq!(args.step, Some("2-4".to_string()));
                assert!(args.use_default);
            }
            _ => panic!("Expected exec subcommand"),
        }
    }

    #[test]
    fn test_exec_title_is_optional() {
        let cli = Cli::parse_from(["snipkit", "exec"]);
        match cli.command {
            Commands::Exec(args) => {
                assert_eq!(args.title, None);
                assert_eq!(args.step, None);
                assert!(!args.use_default);
            }
            _ => panic!("Expected exec subcommand"),
        }
    }

    #[test]
    fn test_new_seed_commands() {
        let cli = Cli::parse_from(["snipkit", "new", "--title", "build", "make", "make test"]);
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.title, Some("build".to_string()));
                assert_eq!(args.commands, vec!["make", "make test"]);
            }
            _ => panic!("Expected new subcommand"),
        }
    }

    #[test]
    fn test_log_level_override_precedence() {
        let cli = Cli::parse_from(["snipkit", "-v", "list"]);
        assert_eq!(cli.log_level_override(), Some("debug"));

        let cli = Cli::parse_from(["snipkit", "-q", "list"]);
        assert_eq!(cli.log_level_override(), Some("error"));

        let cli = Cli::parse_from(["snipkit", "--log-level", "warn", "list"]);
        assert_eq!(cli.log_level_override(), Some("warn"));

        let cli = Cli::parse_from(["snipkit", "list"]);
        assert_eq!(cli.log_level_override(), None);
    }

    #[test]
    fn test_title_from_selection() {
        let title = title_from_selection(Ok(Some("deploy app".to_string()))).unwrap();
        assert_eq!(title, "deploy app");

        assert!(matches!(
            title_from_selection(Ok(None)),
            Err(Error::MissingSnippetTitle)
        ));

        // a finder that failed to launch still surfaces as a missing title
        let launch_failure = Err(crate::types::ExecutionError::StartFailed {
            command: "fzf".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
        .into());
        assert!(matches!(
            title_from_selection(launch_failure),
            Err(Error::MissingSnippetTitle)
        ));
    }

    #[tokio::test]
    async fn test_exec_without_title_and_no_finder_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnippetStore::new(dir.path()).unwrap();

        let mut config = Config::default();
        config.finder.filter_cmd = Some("cat > /dev/null".to_string());

        let args = ExecArgs {
            title: None,
            step: None,
            use_default: false,
        };
        assert!(matches!(
            exec_snippet(&config, &store, args).await,
            Err(Error::MissingSnippetTitle)
        ));
    }

    #[test]
    fn test_snippets_dir_flag_wins_over_config() {
        let config = Config::default();
        let cli = Cli::parse_from(["snipkit", "--snippets-dir", "/tmp/sn", "list"]);
        assert_eq!(cli.snippets_dir(&config), PathBuf::from("/tmp/sn"));

        let cli = Cli::parse_from(["snipkit", "list"]);
        assert_eq!(
            cli.snippets_dir(&config),
            PathBuf::from(&config.storage.snippets_dir)
        );
    }
}
