//! Browser preference store over `localStorage`

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Storage, StorageEvent};

use crate::core::language::{KeyValueStore, StoreError};

fn js_error(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{e:?}"))
}

/// `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Fails in private modes or sandboxed frames that deny storage
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}

/// `navigator.language`
pub fn browser_locale() -> Option<String> {
    web_sys::window().and_then(|w| w.navigator().language())
}

/// Flags `storage` events for one key, raised when another tab writes it.
///
/// The listener is removed from the window on drop.
pub struct StorageListener {
    pending: Rc<Cell<bool>>,
    callback: Closure<dyn Fn(StorageEvent)>,
}

impl StorageListener {
    pub fn attach(key: &'static str) -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let pending = Rc::new(Cell::new(false));

        let flag = pending.clone();
        let callback = Closure::wrap(Box::new(move |e: StorageEvent| {
            // A `None` key means the whole storage area was cleared
            if e.key().map_or(true, |k| k == key) {
                debug!(key, "Storage changed in another tab");
                flag.set(true);
            }
        }) as Box<dyn Fn(StorageEvent)>);
        window
            .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
            .map_err(js_error)?;

        Ok(Self { pending, callback })
    }

    /// True once per batch of external changes
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

impl Drop for StorageListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window
                .remove_event_listener_with_callback("storage", self.callback.as_ref().unchecked_ref())
            {
                warn!(?e, "Failed to detach storage listener");
            }
        }
    }
}
