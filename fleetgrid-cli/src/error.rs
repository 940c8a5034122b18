//! CLI error types

use std::path::PathBuf;

use fleetgrid_lib::error::ViewError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid machine list in {}: {source}", .path.display())]
    Machines {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid log level: {0}")]
    LogLevel(String),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    View(#[from] ViewError),
}
