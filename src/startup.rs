//! Startup checks and fatal startup errors
//!
//! Everything that can stop the process before it serves its first request
//! lives here, so `main` only has to report and exit.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::server;

/// Fatal error raised before the server starts accepting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address: {0}")]
    Address(String),

    #[error("cannot use server root: {0}")]
    Root(#[source] io::Error),

    #[error("failed to initialize logger: {0}")]
    Logger(#[source] io::Error),

    #[error("failed to build runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] io::Error),

    /// The configured port is already bound by another process
    #[error("Port {port} is already in use")]
    AddrInUse { port: u16 },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

impl StartupError {
    /// Extra line printed under the error, if any
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AddrInUse { .. } => {
                Some("Try a different port or stop the other service using it")
            }
            _ => None,
        }
    }
}

/// Bind the listening socket, telling a port conflict apart from other failures
pub fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    server::create_listener(addr).map_err(|source| match source.kind() {
        io::ErrorKind::AddrInUse => StartupError::AddrInUse { port: addr.port() },
        _ => StartupError::Bind { addr, source },
    })
}

/// Names from `required` that are absent under `root`
///
/// Missing files are reported, never fatal.
pub fn missing_files(root: &Path, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !root.join(name.as_str()).exists())
        .cloned()
        .collect()
}

/// Resolve the server root, wrapping the failure
pub fn resolve_root(config: &crate::config::Config) -> Result<PathBuf, StartupError> {
    config.resolve_root().map_err(StartupError::Root)
}
