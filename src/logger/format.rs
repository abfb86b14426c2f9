//! Log line format module
//!
//! Every console line carries a local timestamp in the
//! `[16/Oct/2026 12:34:56]` style, followed by the message.

use chrono::{DateTime, Local, TimeZone};

use super::writer::Level;

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y %H:%M:%S";

/// Prefix `message` with the given timestamp
pub fn stamp<Tz>(time: &DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {message}", time.format(TIMESTAMP_FORMAT))
}

/// Prefix `message` with the current local time
pub fn stamp_now(message: &str) -> String {
    stamp(&Local::now(), message)
}

/// Outcome of a handled request, as it appears in the request log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<'a> {
    /// File served with the given content type
    Served { path: &'a str, content_type: &'a str },
    /// No regular file at the requested path
    NotFound { path: &'a str },
    /// Request escaped the server root
    Rejected { path: &'a str },
    /// Unexpected fault while resolving or reading
    Failed { path: &'a str, detail: &'a str },
    /// Method other than GET or OPTIONS
    MethodNotAllowed { method: &'a str, path: &'a str },
    /// CORS preflight answered
    Preflight { path: &'a str },
}

impl RequestOutcome<'_> {
    /// Render the message part of a request log line
    pub fn message(&self) -> String {
        match self {
            Self::Served { path, content_type } => format!("Served: {path} ({content_type})"),
            Self::NotFound { path } => format!("File not found: {path}"),
            Self::Rejected { path } => format!("Path traversal attempt blocked: {path}"),
            Self::Failed { path, detail } => format!("Error serving {path}: {detail}"),
            Self::MethodNotAllowed { method, path } => {
                format!("Method not allowed: {method} {path}")
            }
            Self::Preflight { path } => format!("Preflight: OPTIONS {path}"),
        }
    }

    /// Severity the outcome is logged at
    pub const fn level(&self) -> Level {
        match self {
            Self::Served { .. } | Self::Preflight { .. } => Level::Info,
            Self::Failed { .. } => Level::Error,
            _ => Level::Warn,
        }
    }
}
