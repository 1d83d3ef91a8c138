//! Process-environment host implementation of the capability traits.

use crate::source::{InjectedConfigSource, LocalePreference, ViewportSource};
use serde_json::Value;
use std::env;

/// Environment variables consulted for the locale preference, in order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Capability implementation backed by the process environment.
///
/// The injected configuration object lives in the environment variable named
/// exactly by the requested key and holds a JSON document, which is the
/// native analog of a bootstrap script assigning an object to a global. The
/// locale preference follows the usual POSIX lookup order. There is no
/// viewport; headless hosts report `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostRuntime;

impl InjectedConfigSource for HostRuntime {
    fn injected_config(&self, key: &str) -> Option<Value> {
        let raw = env::var(key).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl LocalePreference for HostRuntime {
    fn preferred_locale(&self) -> Option<String> {
        LOCALE_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.is_empty())
    }
}

impl ViewportSource for HostRuntime {
    fn viewport_width(&self) -> Option<u32> {
        None
    }
}
