//! Appshell Runtime Capabilities
//!
//! Defines the capability traits the appshell services read the ambient
//! runtime through: an injected configuration object, the user's language
//! preference, and the viewport, plus a severity-aware console sink. Ships
//! an environment-backed host implementation and a scriptable mock.

pub mod console;
pub mod host;
pub mod mock;
pub mod source;

pub use console::{ConsoleSink, LogLevel, ParseLevelError, StdConsole};
pub use host::HostRuntime;
pub use mock::{CaptureConsole, MockRuntime};
pub use source::{InjectedConfigSource, LocalePreference, ViewportSource};
