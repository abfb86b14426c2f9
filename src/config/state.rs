// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;

use super::types::Config;

/// Shared application state
///
/// Built once at startup and handed to every connection behind an `Arc`.
/// The server root lives here rather than in the process working directory.
pub struct AppState {
    pub config: Config,
    /// Canonical server root
    pub root: PathBuf,
}

impl AppState {
    pub fn new(config: &Config, root: PathBuf) -> Self {
        Self {
            config: config.clone(),
            root,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn index_file(&self) -> &str {
        &self.config.site.index_file
    }
}
