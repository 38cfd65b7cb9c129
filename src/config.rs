//! Configuration for the log facade

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FacadeError;
use crate::level::{self, Level};

/// Environment variable holding the console threshold
pub const CONSOLE_LEVEL_ENV: &str = "CONSOLE_LOG_LEVEL";

pub const DEFAULT_FILE_FORMAT: &str =
    "%(asctime)s | %(name)s | %(levelname)-8s | %(funcName)s:%(lineno)d - %(message)s";
pub const DEFAULT_CONSOLE_FORMAT: &str = "%(asctime)s | %(levelname)-8s | %(message)s";
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// When to emit ANSI color escapes on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when the destination is a terminal, subject to
    /// `CLICOLOR_FORCE`, `NO_COLOR` and `CLICOLOR`
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    /// Decide whether to color a destination, reading the process environment
    pub fn enabled(self, destination_is_terminal: bool) -> bool {
        self.enabled_with(destination_is_terminal, |key| std::env::var(key).ok())
    }

    /// Decide whether to color a destination, with an explicit environment
    ///
    /// `CLICOLOR_FORCE` (non-zero) wins, then `NO_COLOR` (any value), then
    /// `CLICOLOR=0`; otherwise color only a terminal.
    pub fn enabled_with<F>(self, destination_is_terminal: bool, env: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            ColorMode::Never => false,
            ColorMode::Always => true,
            ColorMode::Auto => {
                if env("CLICOLOR_FORCE").is_some_and(|value| value != "0") {
                    true
                } else if env("NO_COLOR").is_some() {
                    false
                } else if env("CLICOLOR").is_some_and(|value| value == "0") {
                    false
                } else {
                    destination_is_terminal
                }
            }
        }
    }
}

/// Stream used by the console sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Facade configuration
///
/// The console threshold is deliberately absent: it comes from
/// `CONSOLE_LOG_LEVEL` when the facade is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Logger name shown by `%(name)s`
    #[serde(default = "default_name")]
    pub name: String,

    /// Template for lines written to the log file
    #[serde(default = "default_file_format")]
    pub file_format: String,

    /// Template for lines written to the console
    #[serde(default = "default_console_format")]
    pub console_format: String,

    /// strftime pattern for `%(asctime)s` and banner timestamps
    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default)]
    pub color: ColorMode,

    #[serde(default)]
    pub console_target: ConsoleTarget,

    /// Prefix SUCCESS/FAILED/MESSAGE banners with a timestamp
    #[serde(default = "default_presentation_timestamps")]
    pub presentation_timestamps: bool,
}

fn default_name() -> String {
    "root".to_string()
}

fn default_file_format() -> String {
    DEFAULT_FILE_FORMAT.to_string()
}

fn default_console_format() -> String {
    DEFAULT_CONSOLE_FORMAT.to_string()
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_presentation_timestamps() -> bool {
    true
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            file_format: default_file_format(),
            console_format: default_console_format(),
            time_format: default_time_format(),
            color: ColorMode::default(),
            console_target: ConsoleTarget::default(),
            presentation_timestamps: default_presentation_timestamps(),
        }
    }
}

impl FacadeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, FacadeError> {
        let content = std::fs::read_to_string(path).map_err(|source| FacadeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, FacadeError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the file template
    pub fn with_file_format(mut self, format: impl Into<String>) -> Self {
        self.file_format = format.into();
        self
    }

    /// Replace the console template
    pub fn with_console_format(mut self, format: impl Into<String>) -> Self {
        self.console_format = format.into();
        self
    }

    /// Replace the time format
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }
}

/// Read the console threshold from `CONSOLE_LOG_LEVEL`
pub fn console_level_from_env() -> Level {
    let raw = std::env::var(CONSOLE_LEVEL_ENV).ok();
    level::console_threshold(raw.as_deref())
}
