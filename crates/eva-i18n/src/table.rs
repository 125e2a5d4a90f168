//! Translation tables
//!
//! Nested JSON objects flatten into dot-separated keys:
//! `{"carousel": {"next": "Next"}}` becomes `carousel.next`.

use std::collections::HashMap;

use serde_json::Value;

/// Flat key -> template map for one locale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document into a flat table
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let mut table = Self::new();
        table.flatten(String::new(), &value);
        Ok(table)
    }

    fn flatten(&mut self, prefix: String, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten(child_key(&prefix, key), child);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.flatten(child_key(&prefix, &i.to_string()), child);
                }
            }
            Value::String(s) if !prefix.is_empty() => {
                self.entries.insert(prefix, s.clone());
            }
            Value::Number(n) if !prefix.is_empty() => {
                self.entries.insert(prefix, n.to_string());
            }
            Value::Bool(b) if !prefix.is_empty() => {
                self.entries.insert(prefix, b.to_string());
            }
            _ => {}
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Substitute `{name}` tokens from `params`.
///
/// Tokens without a matching parameter are left in place literally.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match params.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
