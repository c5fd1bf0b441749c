//! Session store: auth token + cached user snapshot.
//!
//! The session lives in durable storage under two independent keys.
//! The cached user is a convenience copy; the backend stays the source
//! of truth and the copy can be stale until the next
//! `get_current_user` refresh. Both keys are shared across tabs with no
//! locking, so a logout in one tab can race a request in another —
//! documented limitation, not defended against here.

use std::rc::Rc;

use crate::models::User;
use crate::storage::StorageAdapter;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "currentUser";

/// Handle on the persisted session. Cheap to clone; all clones share
/// the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn StorageAdapter>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    // --- Token ---

    pub fn set_token(&self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn remove_token(&self) {
        self.storage.remove(TOKEN_KEY);
    }

    // --- Cached user ---

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => {
                self.storage.set(USER_KEY, &json);
            }
            Err(e) => tracing::warn!("failed to serialize session user: {e}"),
        }
    }

    /// Cached user snapshot. A corrupt stored value reads as no user.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    pub fn remove_user(&self) {
        self.storage.remove(USER_KEY);
    }

    // --- Predicates ---

    /// Local check only: a token is present. Says nothing about whether
    /// the server still honors it.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Whether the *cached* user holds an admin role. Stale until the
    /// next `get_current_user` refresh.
    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.role.is_admin()).unwrap_or(false)
    }

    /// Clear both keys. From the caller's point of view this is the
    /// atomic end of the session.
    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}
