//! Severity levels and the console sink capability.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message severity, ordered `Debug < Info < Warn < Error`.
///
/// The derived ordering is what the Logger's minimum-level gate compares
/// against, so the variant order is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostics.
    Debug,
    /// Routine information.
    Info,
    /// Something degraded but recoverable.
    Warn,
    /// Something failed.
    Error,
}

impl LogLevel {
    /// Canonical lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized level labels.
#[derive(Debug, thiserror::Error)]
#[error("unknown log level '{0}', expected one of: debug, info, warn, error")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Destination for emitted log lines.
///
/// Implementations must not buffer indefinitely; a line handed to the sink
/// is considered delivered. Failures inside a sink are treated as a fatal
/// environment problem and are not caught by the Logger.
pub trait ConsoleSink: Send + Sync {
    /// Write one formatted line at the given severity.
    fn write(&self, level: LogLevel, line: &str);
}

/// Standard-stream console: `Debug`/`Info` to stdout, `Warn`/`Error` to
/// stderr, mirroring how browsers split their console channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl ConsoleSink for StdConsole {
    fn write(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::Debug | LogLevel::Info => println!("{line}"),
            LogLevel::Warn | LogLevel::Error => eprintln!("{line}"),
        }
    }
}
