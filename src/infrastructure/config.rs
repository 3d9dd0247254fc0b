//! Runtime settings passed explicitly into each command.

use std::path::PathBuf;
use std::time::Duration;

/// Default history location
pub const DEFAULT_HISTORY_DIR: &str = "~/.hsp/history";

/// Environment variable name for overriding the history location
pub const HISTORY_DIR_ENV_VAR: &str = "HSP_HISTORY_DIR";

/// Client-side bound on a single request, up to the response head
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub history_dir: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Builds the configuration, preferring an explicit history directory
    /// (flag or environment) over the default one. `~` is expanded.
    pub fn load(history_dir: Option<&str>) -> Self {
        let raw = history_dir.unwrap_or(DEFAULT_HISTORY_DIR);
        Self {
            history_dir: PathBuf::from(shellexpand::tilde(raw).into_owned()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
