//! User-agent heuristics
//!
//! Classifies the host's viewport as desktop or not, based on a
//! configurable width breakpoint.

use crate::service::{Service, ServiceHandle};
use appshell_runtime::{HostRuntime, ViewportSource};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

static HANDLE: ServiceHandle<UserAgent> = ServiceHandle::new();

/// Options controlling the desktop heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentOptions {
    /// Minimum viewport width, in pixels, considered a desktop.
    pub desktop_breakpoint: u32,
}

impl Default for UserAgentOptions {
    fn default() -> Self {
        Self {
            desktop_breakpoint: 960,
        }
    }
}

struct Inner {
    options: UserAgentOptions,
    viewport: Arc<dyn ViewportSource>,
}

/// Viewport-based desktop detection.
pub struct UserAgent {
    inner: RwLock<Inner>,
}

impl UserAgent {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                options: UserAgentOptions::default(),
                viewport: Arc::new(HostRuntime),
            }),
        }
    }

    /// Replace the options.
    pub fn set_options(&self, options: UserAgentOptions) {
        self.inner.write().unwrap().options = options;
    }

    pub fn options(&self) -> UserAgentOptions {
        self.inner.read().unwrap().options
    }

    /// Install the viewport capability.
    pub fn set_viewport_source(&self, viewport: Arc<dyn ViewportSource>) {
        self.inner.write().unwrap().viewport = viewport;
    }

    /// Whether the viewport is considered a desktop. A host without a
    /// viewport is not.
    pub fn is_desktop(&self) -> bool {
        let inner = self.inner.read().unwrap();
        match inner.viewport.viewport_width() {
            Some(width) => width >= inner.options.desktop_breakpoint,
            None => false,
        }
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for UserAgent {
    fn create() -> Self {
        Self::new()
    }
}

/// The process-wide UserAgent instance.
pub fn instance() -> Arc<UserAgent> {
    HANDLE.instance()
}

/// Drop the process-wide instance; the next access starts with default
/// options and the host viewport.
pub fn destroy() {
    HANDLE.destroy();
}

/// Replace the options of the process-wide instance.
pub fn set_options(options: UserAgentOptions) {
    instance().set_options(options);
}

/// The options of the process-wide instance.
pub fn options() -> UserAgentOptions {
    instance().options()
}

/// Install a viewport capability on the process-wide instance.
pub fn set_viewport_source(viewport: Arc<dyn ViewportSource>) {
    instance().set_viewport_source(viewport);
}

/// Whether the process-wide instance considers the viewport a desktop.
pub fn is_desktop() -> bool {
    instance().is_desktop()
}
