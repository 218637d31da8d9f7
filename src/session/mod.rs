//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Cookie: <name>=<id>.<signature>
//!     → signer.rs (verify signature)
//!     → store.rs (look up, refresh idle TTL)
//!     → middleware.rs (Session in request extensions, Set-Cookie if new)
//!     → handlers read/write through Session
//! ```

pub mod middleware;
pub mod signer;
pub mod store;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

pub use middleware::{session_middleware, SessionManager};
pub use signer::CookieSigner;
pub use store::{MemoryStore, SessionStore};

/// Handle on the current request's session.
#[derive(Clone, Debug)]
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(id: String, store: Arc<dyn SessionStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read and deserialize `key`. Values that no longer match `T` read as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(&self.id, key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(session_id = %self.id, key, error = %e, "Discarding unreadable session value");
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        if !self.store.set(&self.id, key, value) {
            tracing::debug!(session_id = %self.id, key, "Session expired before write");
        }
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(&self.id, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};
    use std::collections::BTreeMap;
    use std::time::Duration;

    use crate::config::SessionConfig;

    fn manager(secure: bool) -> SessionManager {
        let config = SessionConfig {
            ttl: 60,
            secret: "changethis".into(),
            name: "hod.sid".into(),
        };
        SessionManager::new(Arc::new(MemoryStore::new(Duration::from_secs(60))), &config, secure)
    }

    #[test]
    fn test_typed_values() {
        let manager = manager(false);
        let (session, is_new) = manager.load(&HeaderMap::new());
        assert!(is_new);

        let mut values = BTreeMap::new();
        values.insert("name".to_string(), "Ada".to_string());
        session.insert("app", &values).unwrap();

        let read: BTreeMap<String, String> = session.get("app").unwrap();
        assert_eq!(read, values);
        assert_eq!(session.get::<u32>("app"), None);

        session.remove("app");
        assert_eq!(session.get::<BTreeMap<String, String>>("app"), None);
    }

    #[test]
    fn test_resume_from_cookie() {
        let manager = manager(false);
        let (session, _) = manager.load(&HeaderMap::new());
        let cookie = manager.cookie(&session);
        assert!(cookie.starts_with("hod.sid="));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let pair = cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());

        let (resumed, is_new) = manager.load(&headers);
        assert!(!is_new);
        assert_eq!(resumed.id(), session.id());
    }

    #[test]
    fn test_forged_cookie_starts_new_session() {
        let manager = manager(true);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("hod.sid=forged.0000"));

        let (session, is_new) = manager.load(&headers);
        assert!(is_new);
        assert_ne!(session.id(), "forged");
        assert!(manager.cookie(&session).ends_with("; Secure"));
    }
}
