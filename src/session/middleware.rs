//! Session loading and cookie issue.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::SessionConfig;
use crate::http::cookies;
use crate::session::{CookieSigner, Session, SessionStore};

/// Shared session machinery handed to the middleware as state.
#[derive(Clone, Debug)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: CookieSigner,
    cookie_name: String,
    secure: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig, secure: bool) -> Self {
        Self {
            store,
            signer: CookieSigner::new(config.secret.clone()),
            cookie_name: config.name.clone(),
            secure,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Resume the session named by the request cookie, or start a new one.
    /// The flag is true for a new session.
    pub fn load(&self, headers: &axum::http::HeaderMap) -> (Session, bool) {
        let existing = cookies::get(headers, &self.cookie_name)
            .and_then(|value| self.signer.verify(value))
            .filter(|id| self.store.touch(id));

        match existing {
            Some(id) => (Session::new(id, self.store.clone()), false),
            None => {
                let id = self.store.create();
                tracing::debug!(session_id = %id, "Started session");
                (Session::new(id, self.store.clone()), true)
            }
        }
    }

    /// `Set-Cookie` value for a session.
    pub fn cookie(&self, session: &Session) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name,
            self.signer.sign(session.id())
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Attach a [`Session`] to the request and issue a cookie for new sessions.
pub async fn session_middleware(
    State(manager): State<SessionManager>,
    mut request: Request,
    next: Next,
) -> Response {
    let (session, is_new) = manager.load(request.headers());
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&manager.cookie(&session)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(cookie_name = %manager.cookie_name, error = %e, "Invalid session cookie");
            }
        }
    }

    response
}
