//! Operation configuration: the property bag handed to every operation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TerraformError, TerraformResult};

/// Key/value options for a single terraform operation.
///
/// Values are plain strings; list-valued options hold comma-delimited lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` is present and not set to a false-like value.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of this configuration; its values win.
    pub fn merge(&mut self, other: Configuration) {
        self.entries.extend(other.entries);
    }

    /// Parse a `key=value` definition. A bare `key` means `key=true`.
    pub fn parse_pair(definition: &str) -> TerraformResult<(String, String)> {
        let (key, value) = match definition.split_once('=') {
            Some((key, value)) => (key.trim(), value),
            None => (definition.trim(), "true"),
        };

        if key.is_empty() {
            return Err(TerraformError::configuration(
                definition,
                definition,
                "expected key=value",
            ));
        }

        Ok((key.to_string(), value.to_string()))
    }

    /// Build a configuration from `key=value` definitions.
    pub fn from_pairs<I, S>(definitions: I) -> TerraformResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        definitions
            .into_iter()
            .map(|d| Self::parse_pair(d.as_ref()))
            .collect()
    }

    /// Load a property file. The format follows the extension: `.toml`,
    /// `.yaml`/`.yml` or `.json`.
    ///
    /// Numbers and booleans are stringified, arrays become comma-delimited
    /// lists and nulls are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> TerraformResult<Self> {
        let path = path.as_ref();
        let file_error = |reason: String| TerraformError::PropertyFile {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let raw: BTreeMap<String, Value> = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| file_error(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| file_error(e.to_string()))?
            }
            "json" => serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?,
            other => return Err(file_error(format!("unsupported file type '{}'", other))),
        };

        let mut config = Configuration::new();
        for (key, value) in raw {
            if let Some(value) = stringify(&value).map_err(|reason| file_error(format!("{key}: {reason}")))? {
                config.insert(key, value);
            }
        }
        Ok(config)
    }
}

impl<K, V> FromIterator<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Configuration::new();
        config.extend(iter);
        config
    }
}

impl<K, V> Extend<(K, V)> for Configuration
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Anything except `false`, `0`, `no` or `off` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

fn stringify(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match stringify(item)? {
                    Some(part) if !matches!(item, Value::Array(_)) => parts.push(part),
                    Some(_) => return Err("nested lists are not supported".to_string()),
                    None => {}
                }
            }
            Ok(Some(parts.join(",")))
        }
        Value::Object(_) => Err("tables are not supported".to_string()),
    }
}
