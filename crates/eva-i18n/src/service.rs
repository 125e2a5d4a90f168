//! Locale Service
//!
//! Holds the current locale and its tables, and notifies subscribers when
//! the locale switches. Shared by every component through an `Rc`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::{LocaleError, LocaleSource, TranslationTable, interpolate};

type Listener = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct State {
    locale: String,
    tables: HashMap<String, TranslationTable>,
}

/// Current locale, translation tables and change listeners
pub struct LocaleService {
    state: RefCell<State>,
    listeners: Rc<RefCell<ListenerList>>,
    source: Option<Box<dyn LocaleSource>>,
}

impl std::fmt::Debug for LocaleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LocaleService")
            .field("locale", &state.locale)
            .field("loaded", &state.tables.keys().collect::<Vec<_>>())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl LocaleService {
    /// Create a service with no tables loaded
    pub fn new(default_locale: &str) -> Self {
        Self {
            state: RefCell::new(State {
                locale: default_locale.to_string(),
                tables: HashMap::new(),
            }),
            listeners: Rc::new(RefCell::new(ListenerList::default())),
            source: None,
        }
    }

    /// Builder: load missing tables from `source`
    pub fn with_source(mut self, source: impl LocaleSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Current locale code
    pub fn get_locale(&self) -> String {
        self.state.borrow().locale.clone()
    }

    /// Check if a table is installed for `code`
    pub fn is_locale_loaded(&self, code: &str) -> bool {
        self.state.borrow().tables.contains_key(code)
    }

    /// Install (or replace) the table for `code`
    pub fn add_table(&self, code: &str, table: TranslationTable) {
        self.state.borrow_mut().tables.insert(code.to_string(), table);
    }

    /// Fetch and install the table for `code` from the configured source
    pub fn load_locale(&self, code: &str) -> Result<(), LocaleError> {
        let source = self.source.as_ref().ok_or(LocaleError::NoSource)?;
        let json = source.load(code)?;
        let table = TranslationTable::from_json(&json).map_err(|source| LocaleError::Parse {
            code: code.to_string(),
            source,
        })?;
        tracing::debug!("Loaded locale {} ({} keys)", code, table.len());
        self.add_table(code, table);
        Ok(())
    }

    /// Switch locale, loading its table first if needed.
    ///
    /// A failed load installs an empty table so keys echo back instead of
    /// blocking render. Subscribers are notified when the locale changes.
    pub fn set_locale(&self, code: &str) {
        if !self.is_locale_loaded(code) {
            match self.load_locale(code) {
                Ok(()) => {}
                Err(LocaleError::NoSource) => {
                    tracing::debug!("No locale source, {} starts empty", code);
                    self.add_table(code, TranslationTable::new());
                }
                Err(err) => {
                    tracing::warn!("Failed to load locale {}: {}", code, err);
                    self.add_table(code, TranslationTable::new());
                }
            }
        }

        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.locale != code;
            state.locale = code.to_string();
            changed
        };

        if changed {
            tracing::info!("Locale switched to {}", code);
            self.notify(code);
        }
    }

    /// Translate `key` in the current locale.
    ///
    /// Missing keys return the key itself; `{name}` tokens are filled from
    /// `params` and unresolved tokens stay literal.
    pub fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let state = self.state.borrow();
        let template = state.tables
            .get(&state.locale)
            .and_then(|table| table.get(key))
            .unwrap_or(key);
        interpolate(template, params)
    }

    /// Register a locale-change listener
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Subscription {
        let mut list = self.listeners.borrow_mut();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, Rc::new(listener)));
        Subscription {
            id,
            list: Rc::downgrade(&self.listeners),
        }
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn notify(&self, code: &str) {
        // Snapshot so listeners may subscribe or unsubscribe while running
        let listeners: Vec<Listener> = self.listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(code);
        }
    }
}

/// Handle returned by [`LocaleService::subscribe`]; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    list: Weak<RefCell<ListenerList>>,
}

impl Subscription {
    /// Release the listener now
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticSource;
    use std::cell::Cell;

    fn service() -> LocaleService {
        LocaleService::new("en").with_source(
            StaticSource::new()
                .with("en", r#"{"greeting": "Hello {name}"}"#)
                .with("fr", r#"{"greeting": "Bonjour {name}"}"#)
                .with("broken", "{oops"),
        )
    }

    #[test]
    fn test_missing_key_echoes() {
        let service = service();
        service.set_locale("en");
        assert_eq!(service.translate("missing.key", &[]), "missing.key");
    }

    #[test]
    fn test_translate_with_params() {
        let service = service();
        service.set_locale("fr");
        assert_eq!(service.translate("greeting", &[("name", "Ana")]), "Bonjour Ana");
        assert_eq!(service.translate("greeting", &[]), "Bonjour {name}");
    }

    #[test]
    fn test_failed_load_degrades_to_empty() {
        let service = service();
        service.set_locale("broken");
        assert!(service.is_locale_loaded("broken"));
        assert_eq!(service.get_locale(), "broken");
        assert_eq!(service.translate("greeting", &[]), "greeting");

        service.set_locale("de");
        assert_eq!(service.translate("greeting", &[]), "greeting");
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let service = service();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let sub = service.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(service.listener_count(), 1);

        service.set_locale("fr");
        service.set_locale("fr");
        assert_eq!(hits.get(), 1);

        sub.unsubscribe();
        assert_eq!(service.listener_count(), 0);
        service.set_locale("en");
        assert_eq!(hits.get(), 1);
    }
}
