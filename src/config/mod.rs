//! Application configuration service
//!
//! Resolves the configuration from three layers:
//! 1. Compiled-in defaults
//! 2. `VITE_`-prefixed environment variables
//! 3. The host-injected configuration object

mod resolve;

pub use resolve::{
    Config, ConfigError, ConfigOptions, DEFAULT_INJECTED_CONFIG_KEY, ENV_PREFIX,
};

use crate::service::ServiceHandle;
use appshell_runtime::InjectedConfigSource;
use serde_json::{Map, Value};
use std::sync::Arc;

static HANDLE: ServiceHandle<Config> = ServiceHandle::new();

/// The process-wide Config instance.
pub fn instance() -> Arc<Config> {
    HANDLE.instance()
}

/// Drop the process-wide instance; the next access starts uninitialized.
pub fn destroy() {
    HANDLE.destroy();
}

/// Set up the process-wide instance. Needs to be called at application
/// startup, before any configuration reads.
pub fn setup(options: ConfigOptions) -> Result<(), ConfigError> {
    instance().setup(options)
}

/// Set up the process-wide instance against an explicit injected source.
pub fn setup_with(
    options: ConfigOptions,
    source: &dyn InjectedConfigSource,
) -> Result<(), ConfigError> {
    instance().setup_with(options, source)
}

/// The options of the last successful `setup`.
pub fn get_options() -> Result<ConfigOptions, ConfigError> {
    instance().get_options()
}

/// The resolved configuration map.
pub fn get_config() -> Result<Map<String, Value>, ConfigError> {
    instance().get_config()
}

/// Read a value by dot-separated path.
pub fn get(path: &str) -> Result<Option<Value>, ConfigError> {
    instance().get(path)
}

/// Read a string value by path.
pub fn get_str(path: &str) -> Result<Option<String>, ConfigError> {
    instance().get_str(path)
}

/// Read a boolean value by path.
pub fn get_bool(path: &str) -> Result<Option<bool>, ConfigError> {
    instance().get_bool(path)
}

/// Read an unsigned integer value by path.
pub fn get_u64(path: &str) -> Result<Option<u64>, ConfigError> {
    instance().get_u64(path)
}
