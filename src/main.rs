//! appshell CLI
//!
//! Entry point for the `appshell` command-line tool.

use appshell::config::{self, ConfigOptions};
use appshell::intl::{self, Dictionary, IntlOptions};
use appshell::logger;
use appshell::merge::deep_merge;
use appshell::LogLevel;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "appshell")]
#[command(about = "Application-shell service diagnostics", version)]
struct Cli {
    /// Emit service diagnostics at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the layered configuration and print it as JSON
    Config {
        /// TOML file holding the defaults layer
        #[arg(long)]
        defaults: PathBuf,

        /// Key that must resolve non-empty (repeatable)
        #[arg(long = "required")]
        required: Vec<String>,

        /// Injected-object key to look up (default: INJECTED_CONFIG)
        #[arg(long = "injected-key")]
        injected_key: Option<String>,

        /// Skip the environment layer
        #[arg(long = "no-env")]
        no_env: bool,
    },

    /// Translate a key against a set of locale dictionaries
    Translate {
        /// TOML file holding one table per locale (repeatable, later files win)
        #[arg(long = "dictionaries", required = true)]
        dictionaries: Vec<PathBuf>,

        /// Fallback locale, must be among the dictionaries
        #[arg(long)]
        fallback: String,

        /// Locale to activate (default: the host's language preference)
        #[arg(long)]
        locale: Option<String>,

        /// Substitution variable as name=value (repeatable)
        #[arg(long = "var")]
        vars: Vec<String>,

        /// The key to translate
        key: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logger::set_level(LogLevel::Debug);
    }

    match cli.command {
        Commands::Config {
            defaults,
            required,
            injected_key,
            no_env,
        } => {
            run_config(&defaults, required, injected_key, no_env);
        }
        Commands::Translate {
            dictionaries,
            fallback,
            locale,
            vars,
            key,
        } => {
            run_translate(&dictionaries, &fallback, locale.as_deref(), &vars, &key);
        }
    }
}

fn run_config(defaults: &Path, required: Vec<String>, injected_key: Option<String>, no_env: bool) {
    let default_config = match load_toml_object(defaults) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error loading defaults: {}", e);
            process::exit(2);
        }
    };

    let mut options = ConfigOptions::new(default_config).with_required_keys(required);
    if let Some(key) = injected_key {
        options = options.with_injected_config_key(key);
    }
    if !no_env {
        options = options.with_env(env::vars().collect());
    }

    if let Err(e) = config::setup(options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match config::get_config() {
        Ok(resolved) => match serde_json::to_string_pretty(&resolved) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_translate(
    files: &[PathBuf],
    fallback: &str,
    locale: Option<&str>,
    raw_vars: &[String],
    key: &str,
) {
    // Merge the per-locale tables of all files, later files winning
    let mut merged = Value::Object(Map::new());
    for path in files {
        match load_toml_value(path) {
            Ok(value) => merged = deep_merge(merged, value),
            Err(e) => {
                eprintln!("Error loading dictionaries: {}", e);
                process::exit(2);
            }
        }
    }

    let dictionaries = match build_dictionaries(merged) {
        Ok(dictionaries) => dictionaries,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let vars = match parse_vars(raw_vars) {
        Ok(vars) => vars,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = intl::setup(IntlOptions::new(dictionaries, fallback)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Some(locale) = locale {
        if let Err(e) = intl::set_locale(locale) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let pairs: Vec<(&str, &str)> = vars
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    match intl::translate_with(key, &pairs) {
        Ok(translation) => println!("{}", translation),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Build one dictionary per top-level locale table.
fn build_dictionaries(merged: Value) -> Result<Vec<Dictionary>, String> {
    let tables = match merged {
        Value::Object(tables) => tables,
        _ => return Err("dictionary files must hold one table per locale".to_string()),
    };

    let mut dictionaries = Vec::new();
    for (locale, tree) in tables {
        let dictionary = Dictionary::from_value(&locale, tree)
            .map_err(|e| format!("invalid dictionary for locale '{}': {}", locale, e))?;
        dictionaries.push(dictionary);
    }
    Ok(dictionaries)
}

/// Split `name=value` pairs.
fn parse_vars(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| format!("invalid --var '{}', expected name=value", pair))
        })
        .collect()
}

/// Load and parse a TOML file into a JSON value.
fn load_toml_value(path: &Path) -> Result<Value, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let toml_value: toml::Value =
        toml::from_str(&contents).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(toml_to_json(toml_value))
}

/// Load a TOML file that must hold a table.
fn load_toml_object(path: &Path) -> Result<Map<String, Value>, String> {
    match load_toml_value(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(format!("{}: expected a TOML table", path.display())),
    }
}

/// Convert a TOML value to a JSON value.
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: Map<String, Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}
