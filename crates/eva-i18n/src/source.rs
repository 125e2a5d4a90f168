//! Locale sources
//!
//! Where translation tables come from. Fetching over the network belongs to
//! the embedding application; it plugs in by implementing [`LocaleSource`].

use std::collections::HashMap;

use crate::LocaleError;

/// Provider of raw JSON translation tables
pub trait LocaleSource {
    /// Return the JSON document for `code`
    fn load(&self, code: &str) -> Result<String, LocaleError>;
}

/// In-memory source, keyed by locale code
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tables: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register the JSON for a locale
    pub fn with(mut self, code: &str, json: &str) -> Self {
        self.tables.insert(code.to_string(), json.to_string());
        self
    }
}

impl LocaleSource for StaticSource {
    fn load(&self, code: &str) -> Result<String, LocaleError> {
        self.tables
            .get(code)
            .cloned()
            .ok_or_else(|| LocaleError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source() {
        let source = StaticSource::new().with("fr", "{}");
        assert_eq!(source.load("fr").unwrap(), "{}");
        assert!(matches!(source.load("de"), Err(LocaleError::NotFound(code)) if code == "de"));
    }
}
