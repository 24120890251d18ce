//! Configuration management for texmark.
//!
//! Parses `texmark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `document.title` and `document.author` support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! A bare `$` is kept as written.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document title.
    pub title: Option<String>,
    /// Override document author.
    pub author: Option<String>,
    /// Override GFM tables and strikethrough.
    pub gfm: Option<bool>,
    /// Override math syntax.
    pub math: Option<bool>,
    /// Override standalone document output.
    pub standalone: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "texmark.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document metadata written to the preamble.
    pub document: DocumentConfig,
    /// Markdown dialect and output shape.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Document metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Document title. Empty means no `\maketitle`.
    pub title: String,
    /// Document author.
    pub author: String,
    /// Generator recorded as the PDF author. `None` uses the binary's name
    /// and version.
    pub generator: Option<String>,
}

/// Markdown parsing and output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownConfig {
    /// GitHub Flavored Markdown tables and strikethrough.
    pub gfm: bool,
    /// `$inline$` and `$$display$$` math.
    pub math: bool,
    /// Footnote syntax.
    pub footnotes: bool,
    /// Emit a complete document rather than a body fragment.
    pub standalone: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            math: true,
            footnotes: true,
            standalone: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`document.author`").
        field: String,
        /// Error message (e.g., "${`AUTHOR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `texmark.toml` in the current directory and
    /// its parents, falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(title) = &settings.title {
            self.document.title.clone_from(title);
        }
        if let Some(author) = &settings.author {
            self.document.author.clone_from(author);
        }
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
        if let Some(math) = settings.math {
            self.markdown.math = math;
        }
        if let Some(standalone) = settings.standalone {
            self.markdown.standalone = standalone;
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a generator is given but blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(generator) = &self.document.generator
            && generator.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "document.generator cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in document metadata.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.document.title = expand::expand_env(&self.document.title, "document.title")?;
        self.document.author = expand::expand_env(&self.document.author, "document.author")?;
        Ok(())
    }
}
