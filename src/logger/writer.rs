//! Log writer module
//!
//! Line-oriented console output with a minimum level filter.
//! Info and below go to stdout, warnings and errors to stderr.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::OnceLock;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    const fn is_error_stream(self) -> bool {
        matches!(self, Self::Warn | Self::Error)
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Console log writer
pub struct LogWriter {
    min_level: Level,
}

impl LogWriter {
    const fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Write one line if `level` passes the filter
    pub fn write(&self, level: Level, message: &str) {
        if self.enabled(level) {
            write_line(level, message);
        }
    }
}

/// Write a line straight to the stream matching `level`
///
/// Write failures (closed pipe, full disk) are dropped; logging must never
/// take a request down with it.
pub fn write_line(level: Level, message: &str) {
    if level.is_error_stream() {
        let _ = writeln!(io::stderr().lock(), "{message}");
    } else {
        let _ = writeln!(io::stdout().lock(), "{message}");
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
pub fn init(level: &str) -> io::Result<()> {
    let level = level
        .parse::<Level>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    LOG_WRITER.set(LogWriter::new(level)).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
