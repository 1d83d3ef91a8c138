//! Runtime capability traits consumed by the services.
//!
//! Each trait covers one ambient input a hosted front-end would read from
//! its global scope. Keeping them separate lets a host implement only what
//! it actually has; a server-side host, for instance, has no viewport.

use serde_json::Value;

/// Provides the configuration object the host injected at startup, if any.
pub trait InjectedConfigSource: Send + Sync {
    /// Look up the injected value stored under `key`.
    ///
    /// Returns `None` when the host injected nothing under that name or the
    /// stored value could not be decoded.
    fn injected_config(&self, key: &str) -> Option<Value>;
}

/// Exposes the user's language preference.
pub trait LocalePreference: Send + Sync {
    /// The preferred locale tag, e.g. `en-US`, or `None` when the host has
    /// no notion of one.
    fn preferred_locale(&self) -> Option<String>;
}

/// Exposes the current viewport geometry.
pub trait ViewportSource: Send + Sync {
    /// Viewport width in pixels, or `None` on hosts without a display.
    fn viewport_width(&self) -> Option<u32>;
}
