//! Profile configuration documents.
//! Loads `setup-config.<profile>.yaml` files and answers scalar and list
//! lookups against them. Lookups never fail: a key that cannot be found
//! resolves to an empty string or an empty list.

use crate::constants::PLACEHOLDERS_KEY;
use crate::error::{Error, Result};
use cruet::Inflector;
use indexmap::IndexMap;
use log::{debug, warn};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Placeholder name to raw (unescaped) value, in declaration order.
pub type Placeholders = IndexMap<String, String>;

/// An immutable, parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self { root: Value::Mapping(Mapping::new()) }
    }
}

impl ConfigDocument {
    /// Parses `content`, reporting syntax errors.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the content is not valid YAML
    pub fn try_parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e)))?;
        Ok(Self { root })
    }

    /// Parses `content`, degrading to an empty document on syntax errors.
    pub fn parse(content: &str) -> Self {
        match Self::try_parse(content) {
            Ok(document) => document,
            Err(e) => {
                warn!("{}; continuing with an empty configuration", e);
                Self::default()
            }
        }
    }

    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    /// * `Error::IoError` if the file cannot be read
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Returns the scalar value of `key` as text.
    ///
    /// Without `parent` the first occurrence of `key` in document order is
    /// used, at any depth. With `parent` the search is restricted to the
    /// subtree under the first `parent` key. Numbers and booleans come back
    /// in their textual form; anything else that is not a scalar reads as
    /// an empty string.
    pub fn read_scalar(&self, key: &str, parent: Option<&str>) -> String {
        let scope = match parent {
            Some(parent) => match find_key(&self.root, parent) {
                Some(scope) => scope,
                None => return String::new(),
            },
            None => &self.root,
        };
        find_key(scope, key).and_then(scalar_text).unwrap_or_default()
    }

    /// Returns the items of the list under `key`, in order.
    ///
    /// A missing key, or a key whose value is not a list, yields an empty
    /// list. Non-scalar items are skipped.
    pub fn read_list(&self, key: &str) -> Vec<String> {
        match find_key(&self.root, key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        }
    }

    /// Resolves the placeholder set declared by this document.
    ///
    /// Every scalar leaf reachable through mappings becomes a placeholder
    /// named after its key path in SCREAMING_SNAKE_CASE (`project.name`
    /// gives `PROJECT_NAME`). Lists of scalars are joined with `", "`.
    /// Entries of the top-level `placeholders` mapping are taken verbatim
    /// as names and override derived values.
    pub fn placeholders(&self) -> Placeholders {
        let mut resolved = Placeholders::new();
        let Value::Mapping(root) = &self.root else {
            return resolved;
        };

        for (key, value) in root {
            let Some(key) = key_text(key) else { continue };
            if key == PLACEHOLDERS_KEY {
                continue;
            }
            collect_leaves(&key, value, &mut resolved);
        }

        if let Some(Value::Mapping(explicit)) = root.get(PLACEHOLDERS_KEY) {
            for (name, value) in explicit {
                if let Some(name) = key_text(name) {
                    let value = match value {
                        Value::Sequence(items) => join_items(items),
                        other => scalar_text(other).unwrap_or_default(),
                    };
                    resolved.insert(name, value);
                }
            }
        }
        resolved
    }
}

/// Depth-first, document-ordered search for the first mapping entry named `key`.
fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                if key_text(k).as_deref() == Some(key) {
                    return Some(v);
                }
                if let Some(found) = find_key(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Tagged(tagged) => find_key(&tagged.value, key),
        _ => None,
    }
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn join_items(items: &[Value]) -> String {
    items.iter().filter_map(scalar_text).collect::<Vec<_>>().join(", ")
}

fn placeholder_name(path: &str) -> String {
    path.to_screaming_snake_case()
}

fn collect_leaves(path: &str, value: &Value, resolved: &mut Placeholders) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                if let Some(key) = key_text(key) {
                    collect_leaves(&format!("{path}_{key}"), child, resolved);
                }
            }
        }
        Value::Sequence(items) => {
            resolved.insert(placeholder_name(path), join_items(items));
        }
        other => {
            if let Some(text) = scalar_text(other) {
                resolved.insert(placeholder_name(path), text);
            }
        }
    }
}
