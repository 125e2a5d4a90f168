//! Element Registry
//!
//! Maps custom element names to component factories.

use std::collections::HashMap;

use crate::{Component, RuntimeError};

/// Creates a fresh component instance for a newly connected host
pub type Factory = fn() -> Box<dyn Component>;

/// Names HTML reserves even though they contain a hyphen
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml", "color-profile", "font-face",
    "font-face-src", "font-face-uri", "font-face-format",
    "font-face-name", "missing-glyph",
];

/// Registered element definition
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    /// Attributes whose changes reach `Component::attribute_changed`
    pub observed_attributes: Vec<String>,
    factory: Factory,
}

impl Definition {
    /// Check if `attr` is observed
    pub fn observes(&self, attr: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attr)
    }

    /// Instantiate the component
    pub fn create(&self) -> Box<dyn Component> {
        (self.factory)()
    }
}

/// Custom element registry
#[derive(Debug, Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, Definition>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(
        &mut self,
        name: &str,
        observed_attributes: &[&str],
        factory: Factory,
    ) -> Result<(), RuntimeError> {
        if !Self::is_valid_name(name) {
            return Err(RuntimeError::InvalidName(name.to_string()));
        }
        if self.definitions.contains_key(name) {
            return Err(RuntimeError::AlreadyDefined(name.to_string()));
        }

        self.definitions.insert(name.to_string(), Definition {
            name: name.to_string(),
            observed_attributes: observed_attributes.iter().map(|a| a.to_string()).collect(),
            factory,
        });
        tracing::debug!("Defined <{}>", name);
        Ok(())
    }

    /// Get definition by name
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// Check if defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Defined names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate custom element name
    pub fn is_valid_name(name: &str) -> bool {
        if !name.contains('-') {
            return false;
        }
        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }
        if name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()) {
            return false;
        }
        !RESERVED_NAMES.contains(&name)
    }
}
