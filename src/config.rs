use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::{ConfigError, Result};

/// Top-level configuration for the snipkit CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_snippets_dir")]
    pub snippets_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FinderConfig {
    /// External fuzzy-finder command used when no snippet title is given,
    /// e.g. "fzf" or "peco". Snippet titles are piped to its stdin and the
    /// selected title is read from its stdout.
    #[serde(default)]
    pub filter_cmd: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snippets_dir: default_snippets_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_snippets_dir() -> String {
    home_dir().join(".snipkit/snippets").display().to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    home_dir().join(".config/snipkit/config.toml")
}

impl Config {
    /// Load configuration from a TOML file, failing if the file is missing
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_config_complete() {
        let config_toml = r#"
[storage]
snippets_dir = "/tmp/snippets"

[finder]
filter_cmd = "fzf"

[logging]
level = "debug"
format = "json"
        "#;

        let config: Config = toml::from_str(config_toml).unwrap();

        assert_eq!(config.storage.snippets_dir, "/tmp/snippets");
        assert_eq!(config.finder.filter_cmd, Some("fzf".to_string()));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_config_minimal_applies_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.storage.snippets_dir.ends_with(".snipkit/snippets"));
        assert_eq!(config.finder.filter_cmd, None);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load_from_file("/nonexistent/path/config.toml");
        match result {
            Err(crate::types::Error::Config(ConfigError::FileNotFound { path })) => {
                assert_eq!(path, "/nonexistent/path/config.toml");
            }
            _ => panic!("Expected FileNotFound error"),
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_file("[storage\nsnippets_dir = \"x\"");
        let result = Config::load_from_file(file.path());

        match result {
            Err(crate::types::Error::Config(ConfigError::ParseError(_))) => {}
            _ => panic!("Expected ParseError"),
        }
    }
}
