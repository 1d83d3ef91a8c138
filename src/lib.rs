//! Application-shell utility services
//!
//! A small collection of services consumed by application front-ends:
//! layered configuration, internationalization, an append-only logger,
//! user-agent heuristics, and the singleton lifecycle they all share.

pub mod config;
pub mod intl;
pub mod logger;
pub mod merge;
pub mod service;
pub mod user_agent;

pub use appshell_runtime::LogLevel;
pub use config::{Config, ConfigError, ConfigOptions};
pub use intl::{Dictionary, Intl, IntlError, IntlOptions, MISSING_LOCALIZATION_PREFIX};
pub use logger::{LogMessage, Logger};
pub use merge::{deep_merge, merge_all};
pub use service::{Service, ServiceHandle};
pub use user_agent::{UserAgent, UserAgentOptions};
