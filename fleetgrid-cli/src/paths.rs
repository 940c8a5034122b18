//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "fleetgrid";
const APPLICATION: &str = "fleetgrid";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/fleetgrid` or `~/.config/fleetgrid`
/// - macOS: `~/Library/Application Support/io.fleetgrid.fleetgrid`
/// - Windows: `C:\Users\<User>\AppData\Roaming\fleetgrid\fleetgrid\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the cache directory, where logs are written.
///
/// - Linux: `$XDG_CACHE_HOME/fleetgrid` or `~/.cache/fleetgrid`
/// - macOS: `~/Library/Caches/io.fleetgrid.fleetgrid`
/// - Windows: `C:\Users\<User>\AppData\Local\fleetgrid\fleetgrid\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the config file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log file of the current run.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
