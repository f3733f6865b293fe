//! File-backed preference store for the native build
//!
//! Preferences live in a small JSON object on disk. Every read goes to the
//! file so a second running instance sees writes from the first.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::language::{KeyValueStore, StoreError};

const APP_DIR: &str = "portfolio-fx";
const PREFS_FILE: &str = "prefs.json";

/// Environment override for the preference file path
pub const PREFS_ENV: &str = "PORTFOLIO_FX_PREFS";

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$PORTFOLIO_FX_PREFS`, else `<config dir>/portfolio-fx/prefs.json`
    pub fn from_env() -> Result<Self, StoreError> {
        if let Ok(path) = std::env::var(PREFS_ENV) {
            info!(path = %path, "Preference file from environment");
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| StoreError::Unavailable("no user config directory".into()))?;
        Ok(Self::new(dir.join(APP_DIR).join(PREFS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        debug!(path = %self.path.display(), key, "Preference written");
        Ok(())
    }
}

/// Host locale from the usual POSIX variables
pub fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::{Language, LanguageStore, LANGUAGE_KEY};

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
    }

    #[test]
    fn english_survives_a_fresh_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let first = LanguageStore::new(FileStore::new(&path), Some("it_IT.UTF-8".into()));
        assert_eq!(first.current(), Language::It);
        first.set(Language::En).unwrap();

        let second = LanguageStore::new(FileStore::new(&path), Some("it_IT.UTF-8".into()));
        assert_eq!(second.current(), Language::En);
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        store.set("theme", "light").unwrap();
        store.set(LANGUAGE_KEY, "en").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ nope").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get(LANGUAGE_KEY), Err(StoreError::Json(_))));
    }
}
