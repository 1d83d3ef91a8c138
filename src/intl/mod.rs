//! Internationalization service
//!
//! Resolves translation strings from a set of locale dictionaries, with
//! nested-key lookup, `{name}` parameter substitution, and fallback to a
//! configured locale when the requested one is not supported.

mod dictionary;

pub use dictionary::{Dictionary, MessageNode};

use crate::logger;
use crate::service::ServiceHandle;
use appshell_runtime::{HostRuntime, LocalePreference};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Keys that cannot be translated are returned prefixed with this string,
/// keeping the miss visible in a running UI instead of silently blank.
pub const MISSING_LOCALIZATION_PREFIX: &str = "miss-loc::";

/// Log context for this service's diagnostics.
const LOG_CONTEXT: &str = "Intl";

static HANDLE: ServiceHandle<Intl> = ServiceHandle::new();

/// Options for one `setup` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntlOptions {
    /// One dictionary per supported locale.
    pub dictionaries: Vec<Dictionary>,

    /// Locale used whenever a requested locale is not supported. Must be
    /// among the dictionaries' locales.
    pub fallback_locale: String,
}

impl IntlOptions {
    pub fn new(dictionaries: Vec<Dictionary>, fallback_locale: impl Into<String>) -> Self {
        Self {
            dictionaries,
            fallback_locale: fallback_locale.into(),
        }
    }
}

struct State {
    dictionaries: Vec<Dictionary>,
    fallback_locale: String,
    fallback_index: usize,
    current_locale: String,
    current: usize,
}

/// The internationalization service.
///
/// Uninitialized until `setup` completes; every read operation fails with
/// `IntlError::NotInitialized` before that.
pub struct Intl {
    state: RwLock<Option<State>>,
}

impl Intl {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Set up the service, taking the initial locale from the host's
    /// language preference.
    pub fn setup(&self, options: IntlOptions) -> Result<(), IntlError> {
        self.setup_with(options, &HostRuntime)
    }

    /// Set up the service against an explicit locale preference.
    ///
    /// Fails without touching the current state when the fallback locale is
    /// not among the dictionaries. A runtime reporting no preference leaves
    /// the fallback locale active without a warning.
    pub fn setup_with(
        &self,
        options: IntlOptions,
        preference: &dyn LocalePreference,
    ) -> Result<(), IntlError> {
        let IntlOptions {
            dictionaries,
            fallback_locale,
        } = options;

        let fallback_index = position_of(&dictionaries, &fallback_locale).ok_or_else(|| {
            IntlError::FallbackNotSupported {
                fallback: fallback_locale.clone(),
                supported: dictionaries
                    .iter()
                    .map(|dictionary| dictionary.locale.clone())
                    .collect(),
            }
        })?;

        let mut state = State {
            current_locale: fallback_locale.clone(),
            current: fallback_index,
            dictionaries,
            fallback_locale,
            fallback_index,
        };

        let warning = preference
            .preferred_locale()
            .and_then(|tag| apply_locale(&mut state, primary_subtag(&tag)));

        *self.state.write().unwrap() = Some(state);
        if let Some(text) = warning {
            logger::warn(text, Some(LOG_CONTEXT));
        }
        Ok(())
    }

    /// Activate a locale. An unsupported locale is redirected to the
    /// fallback with a warning.
    pub fn set_locale(&self, locale: &str) -> Result<(), IntlError> {
        let warning = {
            let mut guard = self.state.write().unwrap();
            let state = guard.as_mut().ok_or(IntlError::NotInitialized)?;
            apply_locale(state, locale)
        };
        if let Some(text) = warning {
            logger::warn(text, Some(LOG_CONTEXT));
        }
        Ok(())
    }

    /// Translate a dot-separated key against the current dictionary.
    ///
    /// A key without a translation yields the key prefixed with
    /// [`MISSING_LOCALIZATION_PREFIX`] plus a warning, never an error.
    pub fn translate(&self, key: &str) -> Result<String, IntlError> {
        self.translate_with(key, &[])
    }

    /// Translate a key, substituting `{name}` placeholders.
    ///
    /// Each `(name, value)` pair replaces the first occurrence of its
    /// placeholder, in slice order; placeholders without a matching
    /// variable are left intact.
    pub fn translate_with(&self, key: &str, vars: &[(&str, &str)]) -> Result<String, IntlError> {
        let (resolved, locale) = {
            let guard = self.state.read().unwrap();
            let state = guard.as_ref().ok_or(IntlError::NotInitialized)?;
            (
                state.dictionaries[state.current]
                    .resolve(key)
                    .map(str::to_string),
                state.current_locale.clone(),
            )
        };

        match resolved {
            Some(mut translation) => {
                for (name, value) in vars {
                    translation = translation.replacen(&format!("{{{name}}}"), value, 1);
                }
                Ok(translation)
            }
            None => {
                logger::warn(
                    format!("Cannot translate '{key}' for locale '{locale}'."),
                    Some(LOG_CONTEXT),
                );
                Ok(format!("{MISSING_LOCALIZATION_PREFIX}{key}"))
            }
        }
    }

    /// The active locale.
    pub fn current_locale(&self) -> Result<String, IntlError> {
        self.read(|state| state.current_locale.clone())
    }

    /// The configured fallback locale.
    pub fn fallback_locale(&self) -> Result<String, IntlError> {
        self.read(|state| state.fallback_locale.clone())
    }

    /// All supplied dictionaries.
    pub fn dictionaries(&self) -> Result<Vec<Dictionary>, IntlError> {
        self.read(|state| state.dictionaries.clone())
    }

    /// The dictionary of the active locale.
    pub fn current_dictionary(&self) -> Result<Dictionary, IntlError> {
        self.read(|state| state.dictionaries[state.current].clone())
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Result<T, IntlError> {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map(f)
            .ok_or(IntlError::NotInitialized)
    }
}

impl Default for Intl {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::service::Service for Intl {
    fn create() -> Self {
        Self::new()
    }
}

/// Index of `locale` among the dictionaries.
fn position_of(dictionaries: &[Dictionary], locale: &str) -> Option<usize> {
    dictionaries
        .iter()
        .position(|dictionary| dictionary.locale == locale)
}

/// Activate `requested` on the state, redirecting to the fallback when it
/// is unsupported. Returns the warning to emit, if any.
fn apply_locale(state: &mut State, requested: &str) -> Option<String> {
    match position_of(&state.dictionaries, requested) {
        Some(index) => {
            state.current_locale = requested.to_string();
            state.current = index;
            None
        }
        None => {
            let text = format!(
                "Locale '{requested}' is not supported. Falling back to '{}'.",
                state.fallback_locale
            );
            state.current_locale = state.fallback_locale.clone();
            state.current = state.fallback_index;
            Some(text)
        }
    }
}

/// Reduce a locale tag to its primary subtag (`en-US` → `en`,
/// `de_DE.UTF-8` → `de`).
fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_', '.']).next().unwrap_or(tag)
}

/// The process-wide Intl instance.
pub fn instance() -> Arc<Intl> {
    HANDLE.instance()
}

/// Drop the process-wide instance; the next access starts uninitialized.
pub fn destroy() {
    HANDLE.destroy();
}

/// Set up the process-wide instance. Needs to be called at application
/// startup, before any translation.
pub fn setup(options: IntlOptions) -> Result<(), IntlError> {
    instance().setup(options)
}

/// Set up the process-wide instance against an explicit preference.
pub fn setup_with(
    options: IntlOptions,
    preference: &dyn LocalePreference,
) -> Result<(), IntlError> {
    instance().setup_with(options, preference)
}

/// Activate a locale on the process-wide instance.
pub fn set_locale(locale: &str) -> Result<(), IntlError> {
    instance().set_locale(locale)
}

/// Translate a key against the process-wide instance.
pub fn translate(key: &str) -> Result<String, IntlError> {
    instance().translate(key)
}

/// Translate a key with variables against the process-wide instance.
pub fn translate_with(key: &str, vars: &[(&str, &str)]) -> Result<String, IntlError> {
    instance().translate_with(key, vars)
}

/// The active locale of the process-wide instance.
pub fn current_locale() -> Result<String, IntlError> {
    instance().current_locale()
}

/// The fallback locale of the process-wide instance.
pub fn fallback_locale() -> Result<String, IntlError> {
    instance().fallback_locale()
}

/// The dictionaries of the process-wide instance.
pub fn dictionaries() -> Result<Vec<Dictionary>, IntlError> {
    instance().dictionaries()
}

/// The active dictionary of the process-wide instance.
pub fn current_dictionary() -> Result<Dictionary, IntlError> {
    instance().current_dictionary()
}

/// Internationalization errors
#[derive(Debug, thiserror::Error)]
pub enum IntlError {
    #[error("Intl has not been initialized yet.")]
    NotInitialized,

    #[error("Fallback locale '{fallback}' is not supported by the given dictionaries {supported:?}.")]
    FallbackNotSupported {
        fallback: String,
        supported: Vec<String>,
    },
}
