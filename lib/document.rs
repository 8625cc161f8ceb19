//! Configuration document values.
//!
//! A [`ConfigDocument`] is a mapping of string keys to [`ConfigValue`]s. Values
//! are a closed set of variants (scalar, sequence, mapping) so validation and
//! diffing can match exhaustively. Mappings are ordered by key, which keeps
//! serialized output stable between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, PlatformResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Leaf value inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
}

/// Any value inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Scalar(Scalar),
    Sequence(Vec<ConfigValue>),
    Mapping(BTreeMap<String, ConfigValue>),
}

/// A top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(BTreeMap<String, ConfigValue>);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ConfigValue {
    /// Build a mapping from `(key, value)` pairs.
    pub fn mapping<'a>(entries: impl IntoIterator<Item = (&'a str, ConfigValue)>) -> Self {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Build a sequence of string values.
    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        Self::Sequence(items.iter().map(|s| Self::from(s.as_ref())).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut BTreeMap<String, ConfigValue>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a nested value by key path. Only descends through mappings.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        path.iter()
            .try_fold(self, |value, key| value.as_mapping()?.get(*key))
    }
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Look up a nested value, e.g. `["claude", "statusline", "command"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigValue> {
        let (first, rest) = path.split_first()?;
        self.0.get(*first)?.get_path(rest)
    }

    /// Look up a nested string value.
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get_path(path).and_then(ConfigValue::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, ConfigValue> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, ConfigValue> {
        self.0
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub fn to_pretty_json(&self) -> PlatformResult<String> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(content)
    }

    pub fn from_json_str(content: &str) -> PlatformResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a document from disk. An empty file is an empty document.
    pub fn read(path: &Path) -> PlatformResult<Self> {
        if !path.exists() {
            return Err(PlatformError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        Self::from_json_str(&content)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        Self::Sequence(value)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(value: BTreeMap<String, ConfigValue>) -> Self {
        Self::Mapping(value)
    }
}

impl From<ConfigDocument> for ConfigValue {
    fn from(value: ConfigDocument) -> Self {
        Self::Mapping(value.0)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigDocument {
    fn from(value: BTreeMap<String, ConfigValue>) -> Self {
        Self(value)
    }
}

impl<'a> FromIterator<(&'a str, ConfigValue)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (&'a str, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
