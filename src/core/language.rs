//! Persisted UI language preference
//!
//! The preference is a single string under `LANGUAGE_KEY` in a durable
//! key-value backend. Reads always go to the backend so that another tab
//! or process writing the key is picked up on the next `current()`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage key for the preference
pub const LANGUAGE_KEY: &str = "portfolio-language";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    It,
    En,
}

impl Language {
    /// Only an exact "en" selects English
    pub fn normalize(value: &str) -> Self {
        if value == "en" {
            Language::En
        } else {
            Language::It
        }
    }

    /// Default for a host locale tag such as "en-US" or "it_IT.UTF-8"
    pub fn from_locale(locale: &str) -> Self {
        if locale.to_ascii_lowercase().starts_with("en") {
            Language::En
        } else {
            Language::It
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }

}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable string key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

type Listener = Rc<dyn Fn(Language)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Language preference over a backend, with change listeners
pub struct LanguageStore<S> {
    store: S,
    locale: Option<String>,
    listeners: Rc<RefCell<Listeners>>,
    last_seen: Cell<Language>,
}

impl<S: KeyValueStore> LanguageStore<S> {
    /// `locale` is the host's preferred language tag, used when nothing is
    /// stored yet
    pub fn new(store: S, locale: Option<String>) -> Self {
        let this = Self {
            store,
            locale,
            listeners: Rc::default(),
            last_seen: Cell::new(Language::It),
        };
        this.last_seen.set(this.current());
        this
    }

    fn fallback(&self) -> Language {
        self.locale
            .as_deref()
            .map(Language::from_locale)
            .unwrap_or_default()
    }

    /// Stored value, else locale default. An empty stored value counts as
    /// nothing stored. Reads the backend every call.
    pub fn current(&self) -> Language {
        match self.store.get(LANGUAGE_KEY) {
            Ok(Some(value)) if !value.is_empty() => Language::normalize(&value),
            Ok(_) => self.fallback(),
            Err(e) => {
                warn!(error = %e, "Reading language preference failed, using locale default");
                self.fallback()
            }
        }
    }

    /// Persist, then notify listeners
    pub fn set(&self, language: Language) -> Result<(), StoreError> {
        self.store.set(LANGUAGE_KEY, language.as_str())?;
        debug!(language = %language, "Language preference saved");
        self.last_seen.set(language);
        self.notify(language);
        Ok(())
    }

    /// Handle an external change signal (another tab wrote the key).
    /// Returns true when the effective language changed.
    pub fn sync(&self) -> bool {
        let language = self.current();
        if language == self.last_seen.get() {
            return false;
        }
        debug!(language = %language, "Language changed externally");
        self.last_seen.set(language);
        self.notify(language);
        true
    }

    pub fn subscribe(&self, listener: impl Fn(Language) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    fn notify(&self, language: Language) {
        // Snapshot so a listener may unsubscribe while being notified
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener(language);
        }
    }
}

/// Detaches its listener on drop
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_stored_values() {
        assert_eq!(Language::normalize("en"), Language::En);
        assert_eq!(Language::normalize("it"), Language::It);
        assert_eq!(Language::normalize("EN"), Language::It);
        assert_eq!(Language::normalize("fr"), Language::It);
        assert_eq!(Language::normalize(""), Language::It);
    }

    #[test]
    fn locale_fallback_when_nothing_stored() {
        let en = LanguageStore::new(MemoryStore::new(), Some("en-US".into()));
        assert_eq!(en.current(), Language::En);
        let de = LanguageStore::new(MemoryStore::new(), Some("de-DE".into()));
        assert_eq!(de.current(), Language::It);
        let none = LanguageStore::new(MemoryStore::new(), None);
        assert_eq!(none.current(), Language::It);
    }

    #[test]
    fn empty_stored_value_uses_locale() {
        let backend = MemoryStore::new();
        backend.set(LANGUAGE_KEY, "").unwrap();
        let store = LanguageStore::new(backend, Some("en-US".into()));
        assert_eq!(store.current(), Language::En);
    }

    #[test]
    fn persisted_value_beats_locale_in_fresh_store() {
        let backend = MemoryStore::new();
        let store = LanguageStore::new(backend.clone(), Some("it-IT".into()));
        store.set(Language::En).unwrap();

        let fresh = LanguageStore::new(backend.clone(), Some("it-IT".into()));
        assert_eq!(fresh.current(), Language::En);
        assert_eq!(backend.get(LANGUAGE_KEY).unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn listeners_notified_and_detached() {
        let store = LanguageStore::new(MemoryStore::new(), None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let sub = store.subscribe(move |lang| s.borrow_mut().push(lang));

        store.set(Language::En).unwrap();
        store.set(Language::It).unwrap();
        assert_eq!(*seen.borrow(), vec![Language::En, Language::It]);

        sub.unsubscribe();
        assert_eq!(store.listener_count(), 0);
        store.set(Language::En).unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn sync_notifies_only_on_external_change() {
        let backend = MemoryStore::new();
        let store = LanguageStore::new(backend.clone(), None);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = store.subscribe(move |_| h.set(h.get() + 1));

        assert!(!store.sync());
        // Another tab writes the key
        backend.set(LANGUAGE_KEY, "en").unwrap();
        assert!(store.sync());
        assert!(!store.sync());
        assert_eq!(hits.get(), 1);
        assert_eq!(store.current(), Language::En);
    }

    #[test]
    fn backend_failure_falls_back_to_locale() {
        struct Broken;
        impl KeyValueStore for Broken {
            fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::Unavailable("denied".into()))
            }
            fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::Unavailable("denied".into()))
            }
        }
        let store = LanguageStore::new(Broken, Some("en-GB".into()));
        assert_eq!(store.current(), Language::En);
        assert!(store.set(Language::It).is_err());
    }
}
