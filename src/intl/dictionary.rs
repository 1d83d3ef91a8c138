//! Translation dictionaries and nested-key lookup

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a dictionary's value tree: either a translatable string or
/// a nested table of further nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageNode {
    Leaf(String),
    Branch(BTreeMap<String, MessageNode>),
}

/// Outcome of one lookup step.
enum Step<'a> {
    Found(&'a str),
    Descend(&'a BTreeMap<String, MessageNode>),
    Missing,
}

fn step<'a>(branch: &'a BTreeMap<String, MessageNode>, segment: &str) -> Step<'a> {
    match branch.get(segment) {
        Some(MessageNode::Leaf(text)) => Step::Found(text),
        Some(MessageNode::Branch(next)) => Step::Descend(next),
        None => Step::Missing,
    }
}

/// The translations of one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    /// Locale tag these values belong to, e.g. `de`.
    pub locale: String,

    /// Nested value tree.
    pub values: BTreeMap<String, MessageNode>,
}

impl Dictionary {
    pub fn new(locale: impl Into<String>, values: BTreeMap<String, MessageNode>) -> Self {
        Self {
            locale: locale.into(),
            values,
        }
    }

    /// Build a dictionary from a JSON value tree.
    pub fn from_value(
        locale: impl Into<String>,
        values: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            locale: locale.into(),
            values: serde_json::from_value(values)?,
        })
    }

    /// Build a dictionary from a TOML document holding the value tree.
    pub fn from_toml_str(
        locale: impl Into<String>,
        text: &str,
    ) -> Result<Self, toml::de::Error> {
        Ok(Self {
            locale: locale.into(),
            values: toml::from_str(text)?,
        })
    }

    /// Resolve a dot-separated key against the value tree.
    ///
    /// Walks one segment at a time; a leaf reached at any step is the
    /// result and any remaining segments are ignored. A missing segment,
    /// or running out of segments while still on a branch, is a miss.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let mut branch = &self.values;
        for segment in key.split('.') {
            match step(branch, segment) {
                Step::Found(text) => return Some(text),
                Step::Descend(next) => branch = next,
                Step::Missing => return None,
            }
        }
        None
    }
}
