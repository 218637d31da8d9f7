//! Session storage.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

/// Backing store for session data.
///
/// Every access through `touch`, `get` or `set` refreshes the idle timer.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Create an empty session and return its id.
    fn create(&self) -> String;

    /// Returns true if the session exists and has not expired.
    fn touch(&self, id: &str) -> bool;

    fn get(&self, id: &str, key: &str) -> Option<Value>;

    /// Store a value. Returns false if the session no longer exists.
    fn set(&self, id: &str, key: &str, value: Value) -> bool;

    fn remove(&self, id: &str, key: &str) -> Option<Value>;

    fn destroy(&self, id: &str);

    /// Drop expired sessions, returning how many were removed.
    fn purge_expired(&self) -> usize;

    /// Number of sessions held, including expired ones not yet purged.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct SessionRecord {
    values: HashMap<String, Value>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl SessionRecord {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process session store with an idle TTL.
#[derive(Debug)]
pub struct MemoryStore {
    inner: DashMap<String, SessionRecord>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn deadline(&self, now: Instant) -> Option<Instant> {
        now.checked_add(self.ttl)
    }

    /// Run `f` on a live record, refreshing its expiry. Expired records are
    /// removed and `None` returned.
    fn with_live<R>(&self, id: &str, f: impl FnOnce(&mut SessionRecord) -> R) -> Option<R> {
        let now = Instant::now();
        {
            let mut record = self.inner.get_mut(id)?;
            if !record.is_expired(now) {
                record.expires_at = self.deadline(now);
                return Some(f(&mut *record));
            }
        }
        self.inner.remove(id);
        None
    }
}

impl SessionStore for MemoryStore {
    fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.inner.insert(
            id.clone(),
            SessionRecord {
                values: HashMap::new(),
                expires_at: self.deadline(Instant::now()),
            },
        );
        id
    }

    fn touch(&self, id: &str) -> bool {
        self.with_live(id, |_| ()).is_some()
    }

    fn get(&self, id: &str, key: &str) -> Option<Value> {
        self.with_live(id, |record| record.values.get(key).cloned())
            .flatten()
    }

    fn set(&self, id: &str, key: &str, value: Value) -> bool {
        self.with_live(id, |record| {
            record.values.insert(key.to_string(), value);
        })
        .is_some()
    }

    fn remove(&self, id: &str, key: &str) -> Option<Value> {
        self.with_live(id, |record| record.values.remove(key)).flatten()
    }

    fn destroy(&self, id: &str) {
        self.inner.remove(id);
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.inner.len())
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new(Duration::from_secs(60));
        let id = store.create();

        assert!(store.touch(&id));
        assert!(store.set(&id, "name", json!("Ada")));
        assert_eq!(store.get(&id, "name"), Some(json!("Ada")));
        assert_eq!(store.remove(&id, "name"), Some(json!("Ada")));
        assert_eq!(store.get(&id, "name"), None);
    }

    #[test]
    fn test_unknown_session() {
        let store = MemoryStore::new(Duration::from_secs(60));
        assert!(!store.touch("nope"));
        assert!(!store.set("nope", "k", json!(1)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_expired_sessions_are_dropped_on_access() {
        let store = MemoryStore::new(Duration::ZERO);
        let id = store.create();
        assert_eq!(store.len(), 1);
        assert!(!store.touch(&id));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_purge_expired() {
        let expired = MemoryStore::new(Duration::ZERO);
        expired.create();
        expired.create();
        assert_eq!(expired.purge_expired(), 2);
        assert!(expired.is_empty());

        let live = MemoryStore::new(Duration::from_secs(60));
        live.create();
        assert_eq!(live.purge_expired(), 0);
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_unbounded_ttl_never_expires() {
        let store = MemoryStore::new(Duration::from_secs(u64::MAX));
        let id = store.create();

        assert!(store.touch(&id));
        assert!(store.set(&id, "name", json!("Ada")));
        assert_eq!(store.get(&id, "name"), Some(json!("Ada")));
        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_destroy() {
        let store = MemoryStore::new(Duration::from_secs(60));
        let id = store.create();
        store.destroy(&id);
        assert!(!store.touch(&id));
    }
}
