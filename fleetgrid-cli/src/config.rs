//! Config file loading

use std::fs;
use std::path::Path;

use fleetgrid_lib::ViewConfig;
use serde::Deserialize;
use simplelog::LevelFilter;

use crate::error::CliError;

/// Contents of `config.toml`.
///
/// ```toml
/// log_level = "debug"
///
/// [view]
/// page_size = 25
/// reset_selection_after_bulk = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level for `latest.log`. Default: info
    pub log_level: Option<String>,
    pub view: ViewConfig,
}

impl CliConfig {
    /// Loads the config, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn log_level(&self) -> Result<LevelFilter, CliError> {
        match &self.log_level {
            None => Ok(LevelFilter::Info),
            Some(level) => level
                .parse()
                .map_err(|_| CliError::LogLevel(level.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = CliConfig::parse(
            r#"
            log_level = "debug"

            [view]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
        assert_eq!(config.view.page_size, 25);
        assert!(config.view.reset_selection_after_bulk);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CliConfig::parse("").unwrap();
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = CliConfig::parse(r#"log_level = "loud""#).unwrap();
        assert!(matches!(config.log_level(), Err(CliError::LogLevel(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = CliConfig::load(Path::new("/nonexistent/fleetgrid/config.toml")).unwrap();
        assert_eq!(config.view.page_size, 50);
    }
}
