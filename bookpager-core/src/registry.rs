use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Reading position and bookmarks of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub current_page: usize,
    pub bookmarks: BTreeSet<usize>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            current_page: 1,
            bookmarks: BTreeSet::new(),
        }
    }
}

/// Owns the per-user state entries. Each entry has its own lock so that
/// requests from different users never wait on each other.
pub trait UserRegistry: Send + Sync {
    /// Returns the entry for `user`, creating a default one if needed.
    fn entry(&self, user: UserId) -> Arc<Mutex<UserState>>;
    fn get(&self, user: UserId) -> Option<Arc<Mutex<UserState>>>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime registry backed by a hash map.
pub struct MemoryRegistry {
    inner: RwLock<HashMap<UserId, Arc<Mutex<UserState>>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry for MemoryRegistry {
    fn entry(&self, user: UserId) -> Arc<Mutex<UserState>> {
        if let Some(entry) = self.inner.read().get(&user) {
            return Arc::clone(entry);
        }
        // Another request may have inserted the user between the two locks.
        let mut map = self.inner.write();
        Arc::clone(map.entry(user).or_default())
    }

    fn get(&self, user: UserId) -> Option<Arc<Mutex<UserState>>> {
        self.inner.read().get(&user).cloned()
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_creates_default_state_once() {
        let registry = MemoryRegistry::new();
        assert!(registry.get(7).is_none());
        assert!(registry.is_empty());

        let first = registry.entry(7);
        first.lock().current_page = 3;
        let second = registry.entry(7);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().current_page, 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn users_get_independent_entries() {
        let registry = MemoryRegistry::new();
        registry.entry(1).lock().bookmarks.insert(4);
        assert!(registry.entry(2).lock().bookmarks.is_empty());
        assert_eq!(registry.len(), 2);
    }
}
