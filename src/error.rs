//! Error type for facade construction and configuration

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the facade or resolving levels.
///
/// Logging calls themselves never return these: once the sinks are open,
/// write failures are swallowed and malformed payloads are skipped.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The log file could not be opened for writing
    #[error("failed to open log file {}: {source}", path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `%`-style format template could not be parsed
    #[error("invalid format template {template:?}: {reason}")]
    Template { template: String, reason: String },

    /// A strftime pattern contains an unknown specifier
    #[error("invalid time format {0:?}")]
    TimeFormat(String),

    /// A custom level name was empty or contained whitespace
    #[error("invalid level name {0:?}")]
    InvalidLevelName(String),

    /// No standard or registered level has this name
    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    /// The configuration file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for `FacadeConfig`
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A global tracing subscriber was already installed
    #[error("failed to install tracing bridge: {0}")]
    Bridge(String),
}
