//! Append-only message log with level-gated console emission
//!
//! Every message is recorded in the store for the life of the instance;
//! only messages at or above the configured minimum level reach the
//! console sink. The service needs no setup and is usable immediately.

use crate::service::{Service, ServiceHandle};
use appshell_runtime::{ConsoleSink, LogLevel, StdConsole};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

static HANDLE: ServiceHandle<Logger> = ServiceHandle::new();

/// One recorded log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessage {
    pub text: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl LogMessage {
    /// Console rendition: bracketed context (when present), timestamp, and
    /// level, then the text, joined by two spaces.
    pub fn format_line(&self) -> String {
        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        match &self.context {
            Some(context) => {
                format!("[{context}]  [{timestamp}]  [{}]  {}", self.level, self.text)
            }
            None => format!("[{timestamp}]  [{}]  {}", self.level, self.text),
        }
    }
}

struct Inner {
    min_level: LogLevel,
    messages: Vec<LogMessage>,
    sink: Arc<dyn ConsoleSink>,
}

/// The log service. Default minimum level is `Warn`, the sink is the
/// standard console.
pub struct Logger {
    inner: RwLock<Inner>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                min_level: LogLevel::Warn,
                messages: Vec::new(),
                sink: Arc::new(StdConsole),
            }),
        }
    }

    /// Record a message, emitting it when its level passes the gate.
    pub fn log(&self, level: LogLevel, text: impl Into<String>, context: Option<&str>) {
        let message = LogMessage {
            text: text.into(),
            level,
            timestamp: Utc::now(),
            context: context.map(str::to_string),
        };
        let line = message.format_line();
        // Emit outside the lock so a sink may log in turn without
        // deadlocking.
        let sink = {
            let mut inner = self.inner.write().unwrap();
            let pass = level >= inner.min_level;
            inner.messages.push(message);
            pass.then(|| Arc::clone(&inner.sink))
        };
        if let Some(sink) = sink {
            sink.write(level, &line);
        }
    }

    pub fn debug(&self, text: impl Into<String>, context: Option<&str>) {
        self.log(LogLevel::Debug, text, context);
    }

    pub fn info(&self, text: impl Into<String>, context: Option<&str>) {
        self.log(LogLevel::Info, text, context);
    }

    pub fn warn(&self, text: impl Into<String>, context: Option<&str>) {
        self.log(LogLevel::Warn, text, context);
    }

    /// `Error` is the maximum level, so this always emits.
    pub fn error(&self, text: impl Into<String>, context: Option<&str>) {
        self.log(LogLevel::Error, text, context);
    }

    /// Set the minimum level a message needs to reach the console.
    pub fn set_level(&self, level: LogLevel) {
        self.inner.write().unwrap().min_level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.inner.read().unwrap().min_level
    }

    /// Replace the console sink.
    pub fn set_sink(&self, sink: Arc<dyn ConsoleSink>) {
        self.inner.write().unwrap().sink = sink;
    }

    /// Snapshot of every message recorded so far, oldest first.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.inner.read().unwrap().messages.clone()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for Logger {
    fn create() -> Self {
        Self::new()
    }
}

/// The process-wide Logger instance.
pub fn instance() -> Arc<Logger> {
    HANDLE.instance()
}

/// Drop the process-wide instance. The next access starts over with the
/// default level, an empty store, and the standard console sink.
pub fn destroy() {
    HANDLE.destroy();
}

pub fn debug(text: impl Into<String>, context: Option<&str>) {
    instance().debug(text, context);
}

pub fn info(text: impl Into<String>, context: Option<&str>) {
    instance().info(text, context);
}

pub fn warn(text: impl Into<String>, context: Option<&str>) {
    instance().warn(text, context);
}

pub fn error(text: impl Into<String>, context: Option<&str>) {
    instance().error(text, context);
}

pub fn set_level(level: LogLevel) {
    instance().set_level(level);
}

pub fn level() -> LogLevel {
    instance().level()
}

pub fn set_sink(sink: Arc<dyn ConsoleSink>) {
    instance().set_sink(sink);
}

pub fn messages() -> Vec<LogMessage> {
    instance().messages()
}

#[cfg(test)]
mod tests {
    use super::*;
    use appshell_runtime::CaptureConsole;
    use chrono::TimeZone;

    fn capturing_logger() -> (Logger, CaptureConsole) {
        let logger = Logger::new();
        let console = CaptureConsole::new();
        logger.set_sink(Arc::new(console.clone()));
        (logger, console)
    }

    #[test]
    fn test_default_level_is_warn() {
        let logger = Logger::new();
        assert_eq!(logger.level(), LogLevel::Warn);
    }

    #[test]
    fn test_store_receives_every_message() {
        let (logger, _console) = capturing_logger();
        logger.debug("d", None);
        logger.info("i", None);
        logger.warn("w", None);
        logger.error("e", None);

        let messages = logger.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].text, "d");
        assert_eq!(messages[0].level, LogLevel::Debug);
        assert_eq!(messages[3].text, "e");
        assert_eq!(messages[3].level, LogLevel::Error);
    }

    #[test]
    fn test_default_gate_suppresses_debug_and_info() {
        let (logger, console) = capturing_logger();
        logger.debug("d", None);
        logger.info("i", None);
        logger.warn("w", None);
        logger.error("e", None);

        let emitted: Vec<LogLevel> = console.lines().iter().map(|(level, _)| *level).collect();
        assert_eq!(emitted, vec![LogLevel::Warn, LogLevel::Error]);
    }

    #[test]
    fn test_lowered_gate_emits_everything() {
        let (logger, console) = capturing_logger();
        logger.set_level(LogLevel::Debug);
        logger.debug("d", None);
        logger.info("i", None);
        assert_eq!(console.lines().len(), 2);
    }

    #[test]
    fn test_error_emits_at_the_strictest_gate() {
        let (logger, console) = capturing_logger();
        logger.set_level(LogLevel::Error);
        logger.warn("w", None);
        logger.error("e", None);

        let lines = console.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, LogLevel::Error);
    }

    #[test]
    fn test_context_is_recorded() {
        let (logger, _console) = capturing_logger();
        logger.warn("locale missing", Some("Intl"));
        logger.warn("no context", None);

        let messages = logger.messages();
        assert_eq!(messages[0].context.as_deref(), Some("Intl"));
        assert_eq!(messages[1].context, None);
    }

    #[test]
    fn test_line_format_with_context() {
        let message = LogMessage {
            text: "Required key missing".to_string(),
            level: LogLevel::Warn,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            context: Some("Config".to_string()),
        };
        assert_eq!(
            message.format_line(),
            "[Config]  [2026-01-02T03:04:05.000Z]  [warn]  Required key missing"
        );
    }

    #[test]
    fn test_line_format_without_context() {
        let message = LogMessage {
            text: "hello".to_string(),
            level: LogLevel::Info,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            context: None,
        };
        assert_eq!(
            message.format_line(),
            "[2026-01-02T03:04:05.000Z]  [info]  hello"
        );
    }
}
