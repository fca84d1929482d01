//! Engine configuration, loadable from `latvus.toml`.
//!
//! The CLI or task runner embedding the engine parses its own options and
//! hands the core a constructed `EngineConfig`; the core never reads
//! arguments itself.
//!
//! # Example
//!
//! ```toml
//! output = "dist"
//! template_ext = "tmpl"
//! global_dir = "g"
//! layout_marker = "_"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::Conventions;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Construction-time configuration for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Absolute project root every indexed path is resolved against.
    pub root: PathBuf,
    /// Output directory, relative to the root; never indexed by a scan.
    pub output: PathBuf,
    /// Template file extension (accepted with or without a leading dot).
    pub template_ext: String,
    /// Reserved directory name for global templates.
    pub global_dir: String,
    /// Leading marker identifying layout files.
    pub layout_marker: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            output: PathBuf::from("dist"),
            template_ext: "tmpl".to_string(),
            global_dir: "g".to_string(),
            layout_marker: '_',
        }
    }
}

impl EngineConfig {
    /// Default configuration anchored at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file. The project root defaults to
    /// the directory containing the file when the file does not set one.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: Self = toml::from_str(&raw)?;

        if config.root.as_os_str().is_empty() {
            config.root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        }
        config.validate()?;
        Ok(config)
    }

    /// The template extension without a leading dot.
    pub fn template_extension(&self) -> &str {
        self.template_ext.trim_start_matches('.')
    }

    /// Naming conventions derived from this configuration.
    pub fn conventions(&self) -> Conventions {
        Conventions {
            template_ext: self.template_extension().to_string(),
            global_dir: self.global_dir.clone(),
            layout_marker: self.layout_marker,
        }
    }

    /// Validate field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation("project root is not set".to_string()));
        }
        if self.template_extension().is_empty() {
            return Err(ConfigError::Validation(
                "template extension must not be empty".to_string(),
            ));
        }
        if self.template_extension().contains('.') {
            return Err(ConfigError::Validation(format!(
                "template extension `{}` must be a single extension",
                self.template_ext
            )));
        }
        if self.global_dir.is_empty() || self.global_dir.contains('/') {
            return Err(ConfigError::Validation(format!(
                "global directory name `{}` must be a single path segment",
                self.global_dir
            )));
        }
        if self.layout_marker == '.' || self.layout_marker == '/' {
            return Err(ConfigError::Validation(format!(
                "layout marker `{}` collides with path syntax",
                self.layout_marker
            )));
        }
        Ok(())
    }
}
