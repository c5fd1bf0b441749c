//! Durable key-value storage abstraction.
//!
//! All session persistence goes through [`StorageAdapter`], so the
//! underlying mechanism (browser LocalStorage in production, an
//! in-memory map in tests) is swappable and no other module touches the
//! raw storage keys.

use std::cell::RefCell;
use std::collections::HashMap;

// =========================================================
// Abstract storage interface
// =========================================================

/// String key-value storage shared across the whole origin.
///
/// Writes are best-effort: `set`/`remove` report whether the operation
/// took effect. No locking is applied across tabs.
pub trait StorageAdapter {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

// =========================================================
// In-memory implementation (tests, native hosts)
// =========================================================

/// Plain in-memory storage. Used by tests and by native consumers that
/// have no browser storage to talk to.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key).is_some()
    }
}

// =========================================================
// Browser implementation (LocalStorage)
// =========================================================

/// `window.localStorage` adapter.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageAdapter;

#[cfg(target_arch = "wasm32")]
impl LocalStorageAdapter {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageAdapter for LocalStorageAdapter {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
