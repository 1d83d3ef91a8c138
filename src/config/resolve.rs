//! Layered configuration resolution
//!
//! `setup` composes the resolved config from three layers in strict
//! precedence order:
//! 1. Compiled-in defaults
//! 2. Environment variables carrying the `VITE_` prefix (stripped)
//! 3. The host-injected configuration object
//!
//! Layering is flat: later layers overwrite per top-level key. The nested
//! recursive merge lives in `crate::merge` and is deliberately not used
//! here.

use crate::logger;
use appshell_runtime::{HostRuntime, InjectedConfigSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Environment keys carrying this prefix contribute to the environment
/// layer, with the prefix stripped.
pub const ENV_PREFIX: &str = "VITE_";

/// Injected-object key used when the options name none.
pub const DEFAULT_INJECTED_CONFIG_KEY: &str = "INJECTED_CONFIG";

/// Log context for this service's diagnostics.
const LOG_CONTEXT: &str = "Config";

/// Options for one `setup` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// Compiled-in defaults, lowest precedence.
    #[serde(default)]
    pub default_config: Map<String, Value>,

    /// Environment-variable source, e.g. a captured process environment.
    /// When absent the environment layer is skipped entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Key the host stores the injected configuration object under
    /// (`INJECTED_CONFIG` when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected_config_key: Option<String>,

    /// Keys that must resolve to a non-empty value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_keys: Vec<String>,
}

impl ConfigOptions {
    /// Options carrying only the given defaults layer.
    pub fn new(default_config: Map<String, Value>) -> Self {
        Self {
            default_config,
            ..Self::default()
        }
    }

    /// Supply the environment-variable source.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Override the injected-object key.
    pub fn with_injected_config_key(mut self, key: impl Into<String>) -> Self {
        self.injected_config_key = Some(key.into());
        self
    }

    /// Declare keys that must resolve non-empty.
    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// The injected-object key, falling back to the default.
    pub fn injected_key(&self) -> &str {
        self.injected_config_key
            .as_deref()
            .unwrap_or(DEFAULT_INJECTED_CONFIG_KEY)
    }
}

struct State {
    options: ConfigOptions,
    resolved: Map<String, Value>,
}

/// The configuration service.
///
/// Holds the options and resolved map of the most recent successful
/// `setup`. A failed `setup` commits nothing; the previous state, if any,
/// stays in force.
pub struct Config {
    state: RwLock<Option<State>>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Resolve and commit the configuration, reading the injected layer
    /// from the process environment.
    pub fn setup(&self, options: ConfigOptions) -> Result<(), ConfigError> {
        self.setup_with(options, &HostRuntime)
    }

    /// Resolve and commit the configuration against an explicit injected
    /// source.
    pub fn setup_with(
        &self,
        options: ConfigOptions,
        source: &dyn InjectedConfigSource,
    ) -> Result<(), ConfigError> {
        let mut resolved = options.default_config.clone();

        if let Some(env) = &options.env {
            let layer = env_layer(env);
            if layer.is_empty() {
                logger::debug(
                    format!("No '{ENV_PREFIX}' keys in the environment source"),
                    Some(LOG_CONTEXT),
                );
            } else {
                logger::debug(
                    format!("Environment config found: {}", Value::Object(layer.clone())),
                    Some(LOG_CONTEXT),
                );
                resolved.extend(layer);
            }
        }

        let key = options.injected_key();
        match source.injected_config(key) {
            Some(Value::Object(injected)) => {
                logger::debug(
                    format!(
                        "Injected config found: {}",
                        Value::Object(injected.clone())
                    ),
                    Some(LOG_CONTEXT),
                );
                resolved.extend(injected);
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                logger::warn(
                    format!(
                        "Ignoring injected config under '{key}': expected an object, found {}",
                        value_kind(&other)
                    ),
                    Some(LOG_CONTEXT),
                );
            }
        }

        check_required_keys(&resolved, &options.required_keys)?;

        *self.state.write().unwrap() = Some(State { options, resolved });
        Ok(())
    }

    /// The options of the last successful `setup`.
    pub fn get_options(&self) -> Result<ConfigOptions, ConfigError> {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map(|state| state.options.clone())
            .ok_or(ConfigError::NotInitialized)
    }

    /// The resolved configuration map.
    pub fn get_config(&self) -> Result<Map<String, Value>, ConfigError> {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map(|state| state.resolved.clone())
            .ok_or(ConfigError::NotInitialized)
    }

    /// Read a value by dot-separated path.
    pub fn get(&self, path: &str) -> Result<Option<Value>, ConfigError> {
        let guard = self.state.read().unwrap();
        let state = guard.as_ref().ok_or(ConfigError::NotInitialized)?;
        Ok(lookup(&state.resolved, path).cloned())
    }

    /// Read a string value by path.
    pub fn get_str(&self, path: &str) -> Result<Option<String>, ConfigError> {
        Ok(self
            .get(path)?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Read a boolean value by path.
    pub fn get_bool(&self, path: &str) -> Result<Option<bool>, ConfigError> {
        Ok(self.get(path)?.and_then(|value| value.as_bool()))
    }

    /// Read an unsigned integer value by path.
    pub fn get_u64(&self, path: &str) -> Result<Option<u64>, ConfigError> {
        Ok(self.get(path)?.and_then(|value| value.as_u64()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::service::Service for Config {
    fn create() -> Self {
        Self::new()
    }
}

/// Collect the `VITE_`-prefixed keys of `env`, prefix stripped, as string
/// values.
fn env_layer(env: &BTreeMap<String, String>) -> Map<String, Value> {
    let mut layer = Map::new();
    for (key, value) in env {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            layer.insert(stripped.to_string(), Value::String(value.clone()));
        }
    }
    layer
}

/// Walk a dot-separated path into the resolved map.
fn lookup<'a>(resolved: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = resolved.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

/// Missing, null, and blank strings count as empty. `0`, `false`, `{}`,
/// and `[]` do not.
fn is_empty_or_whitespace(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Validate the required keys in order, stopping at the first failure.
fn check_required_keys(
    resolved: &Map<String, Value>,
    required: &[String],
) -> Result<(), ConfigError> {
    for key in required {
        if is_empty_or_whitespace(resolved.get(key)) {
            return Err(ConfigError::MissingRequiredKey(key.clone()));
        }
    }
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config has not been initialized yet. Call setup() first.")]
    NotInitialized,

    #[error("Required key '{0}' is not defined in the config. Define it in the default, environment, or injected config.")]
    MissingRequiredKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use appshell_runtime::MockRuntime;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_only() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"FOO": "bar"})));
        config.setup_with(options, &MockRuntime::new()).unwrap();

        assert_eq!(config.get_config().unwrap(), object(json!({"FOO": "bar"})));
    }

    #[test]
    fn test_env_beats_default() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"FOO": "bar"})))
            .with_env(env_of(&[("VITE_FOO", "baz")]));
        config.setup_with(options, &MockRuntime::new()).unwrap();

        assert_eq!(config.get_config().unwrap(), object(json!({"FOO": "baz"})));
    }

    #[test]
    fn test_injected_beats_env_beats_default() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"FOO": "bar"})))
            .with_env(env_of(&[("VITE_FOO", "baz")]));
        let runtime =
            MockRuntime::new().with_injected_config("INJECTED_CONFIG", json!({"FOO": "foz"}));
        config.setup_with(options, &runtime).unwrap();

        assert_eq!(config.get_config().unwrap(), object(json!({"FOO": "foz"})));
    }

    #[test]
    fn test_unprefixed_env_keys_are_ignored() {
        let config = Config::new();
        let options = ConfigOptions::new(Map::new())
            .with_env(env_of(&[("VITE_FOO", "baz"), ("HOME", "/root"), ("PATH", "/bin")]));
        config.setup_with(options, &MockRuntime::new()).unwrap();

        assert_eq!(config.get_config().unwrap(), object(json!({"FOO": "baz"})));
    }

    #[test]
    fn test_custom_injected_key() {
        let config = Config::new();
        let options =
            ConfigOptions::new(Map::new()).with_injected_config_key("MY_INJECTED_CONFIG");
        let runtime = MockRuntime::new()
            .with_injected_config("MY_INJECTED_CONFIG", json!({"FOO": "custom"}))
            .with_injected_config("INJECTED_CONFIG", json!({"FOO": "default-key"}));
        config.setup_with(options, &runtime).unwrap();

        assert_eq!(config.get_str("FOO").unwrap().as_deref(), Some("custom"));
    }

    #[test]
    fn test_non_object_injected_value_is_ignored() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"FOO": "bar"})));
        let runtime =
            MockRuntime::new().with_injected_config("INJECTED_CONFIG", json!("not an object"));
        config.setup_with(options, &runtime).unwrap();

        assert_eq!(config.get_config().unwrap(), object(json!({"FOO": "bar"})));
    }

    #[test]
    fn test_missing_required_key_fails_naming_it() {
        let config = Config::new();
        let options =
            ConfigOptions::new(object(json!({"FOO": "foz"}))).with_required_keys(["BAR"]);
        let err = config
            .setup_with(options, &MockRuntime::new())
            .unwrap_err();

        assert!(matches!(err, ConfigError::MissingRequiredKey(ref key) if key == "BAR"));
        assert!(err.to_string().contains("'BAR'"));
        // Nothing was committed
        assert!(matches!(
            config.get_config(),
            Err(ConfigError::NotInitialized)
        ));
    }

    #[test]
    fn test_first_failing_required_key_wins() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"B": "set"})))
            .with_required_keys(["A", "B", "C"]);
        let err = config
            .setup_with(options, &MockRuntime::new())
            .unwrap_err();

        assert!(matches!(err, ConfigError::MissingRequiredKey(ref key) if key == "A"));
    }

    #[test]
    fn test_blank_and_null_count_as_empty() {
        for empty in [json!(""), json!("   "), json!(null)] {
            let config = Config::new();
            let options = ConfigOptions::new(object(json!({"KEY": empty})))
                .with_required_keys(["KEY"]);
            assert!(config.setup_with(options, &MockRuntime::new()).is_err());
        }
    }

    #[test]
    fn test_falsy_but_present_values_satisfy_required_keys() {
        for present in [json!(0), json!(false), json!({}), json!([])] {
            let config = Config::new();
            let options = ConfigOptions::new(object(json!({"KEY": present})))
                .with_required_keys(["KEY"]);
            assert!(config.setup_with(options, &MockRuntime::new()).is_ok());
        }
    }

    #[test]
    fn test_access_before_setup_fails() {
        let config = Config::new();
        assert!(matches!(
            config.get_config(),
            Err(ConfigError::NotInitialized)
        ));
        assert!(matches!(
            config.get_options(),
            Err(ConfigError::NotInitialized)
        ));
        assert!(matches!(config.get("FOO"), Err(ConfigError::NotInitialized)));
    }

    #[test]
    fn test_resetup_replaces_wholesale() {
        let config = Config::new();
        let first = ConfigOptions::new(object(json!({"FOO": "bar", "STALE": true})));
        config.setup_with(first, &MockRuntime::new()).unwrap();

        let second = ConfigOptions::new(object(json!({"FOO": "fresh"})));
        config.setup_with(second, &MockRuntime::new()).unwrap();

        let resolved = config.get_config().unwrap();
        assert_eq!(resolved, object(json!({"FOO": "fresh"})));
        assert!(!resolved.contains_key("STALE"));
    }

    #[test]
    fn test_options_round_trip() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({"FOO": "bar"})))
            .with_injected_config_key("MY_KEY")
            .with_required_keys(["FOO"]);
        config
            .setup_with(options.clone(), &MockRuntime::new())
            .unwrap();

        let stored = config.get_options().unwrap();
        assert_eq!(stored.injected_key(), "MY_KEY");
        assert_eq!(stored.required_keys, vec!["FOO".to_string()]);
        assert_eq!(stored.default_config, options.default_config);
    }

    #[test]
    fn test_dot_path_readers() {
        let config = Config::new();
        let options = ConfigOptions::new(object(json!({
            "api": {"url": "http://localhost:3000", "retries": 3, "tls": false}
        })));
        config.setup_with(options, &MockRuntime::new()).unwrap();

        assert_eq!(
            config.get_str("api.url").unwrap().as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(config.get_u64("api.retries").unwrap(), Some(3));
        assert_eq!(config.get_bool("api.tls").unwrap(), Some(false));
        assert_eq!(config.get("api.missing").unwrap(), None);
        // Mistyped reads degrade to None
        assert_eq!(config.get_u64("api.url").unwrap(), None);
    }
}
