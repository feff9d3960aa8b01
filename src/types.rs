use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Step range error: {0}")]
    Range(#[from] RangeError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Step {index} failed: {source}")]
    Step {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("No snippet found with title \"{title}\", run \"snipkit list\" to view all snippets")]
    SnippetNotFound { title: String },

    #[error("No snippet title given; pass a title or configure finder.filter_cmd (e.g. \"fzf\" or \"peco\") for interactive selection")]
    MissingSnippetTitle,

    #[error("Snippet file parse error: {0}")]
    SnippetParse(#[from] serde_json::Error),

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Prompt error: {0}")]
    Prompt(#[from] rustyline::error::ReadlineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Application error: {0}")]
    Application(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config file parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Step range expression errors
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Malformed step range expression \"{expr}\", expected \"<n>\", \"<n>-<m>\" or \"<n>-\"")]
    Malformed { expr: String },

    #[error("Step range \"{expr}\" is out of bounds or inverted, valid steps are 1-{steps}")]
    Invalid { expr: String, steps: usize },
}

/// Template resolution errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Command still contains placeholders after substitution: {command}")]
    Unresolved { command: String },

    #[error("Template rendering failed: {source}")]
    Render {
        #[from]
        source: handlebars::RenderError,
    },
}

/// Execution-related errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command '{command}' could not be started: {source}")]
    StartFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {code}")]
    NonZeroExit { command: String, code: i32 },

    #[error("Command '{command}' was terminated by a signal")]
    Terminated { command: String },

    #[error("Empty command segment")]
    EmptyCommand,
}

/// Type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
