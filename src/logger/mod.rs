//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging (startup banner, shutdown)
//! - Per-request logging with timestamps
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::RequestOutcome;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(&config.logging.level)
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None => writer::write_line(level, message),
    }
}

/// Write to info log
fn write_info(message: &str) {
    write(Level::Info, message);
}

/// Write to error log
fn write_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    let port = addr.port();
    let rule = "=".repeat(60);
    write_info(&format!("\n{rule}"));
    write_info("Static Responder");
    write_info(&rule);
    write_info(&format!("Server running at: http://localhost:{port}"));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Serving from: {}", root.display()));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("\nAvailable pages:");
    write_info(&format!("   * Homepage: http://localhost:{port}"));
    for page in &config.site.example_pages {
        write_info(&format!("   * {}: http://localhost:{port}/{page}", page_title(page)));
    }
    write_info("\nFor LocalTunnel access:");
    for line in tunnel_hint(port, &config.site.tunnel_subdomain) {
        write_info(&line);
    }
    write_info("\nPress Ctrl+C to stop the server");
    write_info(&format!("{rule}\n"));
}

fn tunnel_hint(port: u16, subdomain: &str) -> [String; 3] {
    [
        "   1. Install LocalTunnel: npm install -g localtunnel".to_string(),
        format!("   2. Run: lt --port {port} --subdomain {subdomain}"),
        format!("   3. Access at: https://{subdomain}.loca.lt"),
    ]
}

/// `volunteer.html` -> `Volunteer`
fn page_title(page: &str) -> String {
    let stem = Path::new(page)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(page);
    let mut chars = stem.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

pub fn log_missing_files(missing: &[String]) {
    if missing.is_empty() {
        write_info("All essential files found");
    } else {
        log_warning(&format!("Missing files: {}", missing.join(", ")));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format::stamp_now(&format!(
        "[Connection] Accepted from: {peer_addr}"
    )));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// Log the outcome of a single request
pub fn log_request(outcome: &RequestOutcome<'_>) {
    write(outcome.level(), &format::stamp_now(&outcome.message()));
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("WARNING: {message}"));
}

/// Report a fatal startup error, with an optional hint line
pub fn log_startup_error(message: &str, hint: Option<&str>) {
    write_error(&format!("\nError: {message}"));
    if let Some(hint) = hint {
        write_error(&format!("   {hint}"));
    }
}

pub fn log_shutdown() {
    write_info("\n\nServer stopped by user");
}
