// Configuration module entry point
// Manages application configuration and the shared runtime state

mod state;
mod types;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::{Config, PerformanceConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Files the site is expected to ship with
const REQUIRED_FILES: [&str; 4] = ["index.html", "styles.css", "script.js", "feed-times.csv"];

/// Pages advertised in the startup banner
const EXAMPLE_PAGES: [&str; 3] = ["donate.html", "volunteer.html", "contact.html"];

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; environment variables prefixed with `RESPONDER_`
    /// (nested keys separated by `__`) override it, e.g.
    /// `RESPONDER_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RESPONDER")
                    .prefix_separator("_")
                    .separator("__"),
            );

        with_defaults(builder)?.build()?.try_deserialize()
    }

    /// Built-in configuration with no file or environment sources
    #[cfg(test)]
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the directory files are served from
    ///
    /// Uses `server.root` when set, otherwise the directory containing the
    /// running executable. The result is canonical so later containment
    /// checks compare like with like.
    pub fn resolve_root(&self) -> io::Result<PathBuf> {
        let root = match self.server.root.as_deref() {
            Some(dir) => PathBuf::from(dir),
            None => {
                let exe = std::env::current_exe()?;
                exe.parent().map(PathBuf::from).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "executable has no parent directory",
                    )
                })?
            }
        };

        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("server root is not a directory: {}", root.display()),
            ));
        }
        Ok(root)
    }
}

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", false)?
        .set_default("performance.keep_alive", true)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("performance.shutdown_grace", 5)?
        .set_default("site.index_file", "index.html")?
        .set_default("site.required_files", REQUIRED_FILES.to_vec())?
        .set_default("site.example_pages", EXAMPLE_PAGES.to_vec())?
        .set_default("site.tunnel_subdomain", "homeless-aid")
}
