//! Error types shared by the coordinator, the widget layer and configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for widget-facing operations
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Failures reported by an embed or its control API.
///
/// None of these are fatal for the coordinator: callers log them and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// The widget's event bindings were torn down (surface evicted or released)
    #[error("widget for {0} is no longer bound")]
    Unbound(String),

    /// The embed never signalled readiness
    #[error("widget for {0} is not ready")]
    NotReady(String),

    /// No embed is mounted for the given handle
    #[error("no embed mounted with id {0}")]
    UnknownEmbed(u64),

    /// The embed could not be created for a track url
    #[error("cannot create embed for {url}: {reason}")]
    Embed { url: String, reason: String },
}

/// Failures while loading configuration or profile files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("profile {0} has no playable tracks")]
    EmptyProfile(String),
}
