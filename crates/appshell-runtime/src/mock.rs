//! Scriptable runtime and capturing console for tests.

use crate::console::{ConsoleSink, LogLevel};
use crate::source::{InjectedConfigSource, LocalePreference, ViewportSource};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Scriptable implementation of all three source traits.
///
/// Built up with the `with_*` chainers, then handed to a service under test.
#[derive(Debug, Clone, Default)]
pub struct MockRuntime {
    injected: BTreeMap<String, Value>,
    locale: Option<String>,
    viewport_width: Option<u32>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as the injected configuration object under `key`.
    pub fn with_injected_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.injected.insert(key.into(), value);
        self
    }

    /// Report `locale` as the user's language preference.
    pub fn with_preferred_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Report a viewport of the given width.
    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = Some(width);
        self
    }
}

impl InjectedConfigSource for MockRuntime {
    fn injected_config(&self, key: &str) -> Option<Value> {
        self.injected.get(key).cloned()
    }
}

impl LocalePreference for MockRuntime {
    fn preferred_locale(&self) -> Option<String> {
        self.locale.clone()
    }
}

impl ViewportSource for MockRuntime {
    fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }
}

/// Capturing console sink.
///
/// Clones share the underlying buffer, so a test can keep one handle and
/// install another on the service under test.
#[derive(Debug, Clone, Default)]
pub struct CaptureConsole {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, in emission order.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Discard the captured lines.
    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl ConsoleSink for CaptureConsole {
    fn write(&self, level: LogLevel, line: &str) {
        self.lines.lock().unwrap().push((level, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_runtime_reports_scripted_values() {
        let runtime = MockRuntime::new()
            .with_injected_config("APP_CONFIG", json!({"debug": true}))
            .with_preferred_locale("de-AT")
            .with_viewport_width(1280);

        assert_eq!(
            runtime.injected_config("APP_CONFIG"),
            Some(json!({"debug": true}))
        );
        assert_eq!(runtime.injected_config("OTHER"), None);
        assert_eq!(runtime.preferred_locale(), Some("de-AT".to_string()));
        assert_eq!(runtime.viewport_width(), Some(1280));
    }

    #[test]
    fn test_mock_runtime_default_is_empty() {
        let runtime = MockRuntime::new();
        assert_eq!(runtime.injected_config("APP_CONFIG"), None);
        assert_eq!(runtime.preferred_locale(), None);
        assert_eq!(runtime.viewport_width(), None);
    }

    #[test]
    fn test_capture_console_shares_buffer_across_clones() {
        let console = CaptureConsole::new();
        let handle = console.clone();

        console.write(LogLevel::Warn, "first");
        handle.write(LogLevel::Info, "second");

        assert_eq!(
            console.lines(),
            vec![
                (LogLevel::Warn, "first".to_string()),
                (LogLevel::Info, "second".to_string()),
            ]
        );

        console.clear();
        assert!(handle.lines().is_empty());
    }
}
