//! Login state carried in the caller's `tower-sessions` session.
//!
//! - [`SESSION_DATA_KEY`] is the key holding [`SessionData`] inside the session record.
//! - [`session_layer`] builds the cookie-managing middleware from [`SessionConfig`].
//!
//! A session is only ever resolved from the request's own cookie, and login
//! cycles the id so a cookie issued before authentication never becomes an
//! authenticated one.

use serde::{Deserialize, Serialize};
use tower_sessions::{cookie::SameSite, Expiry, Session, SessionManagerLayer, SessionStore};

use crate::config::SessionConfig;

pub const SESSION_DATA_KEY: &str = "account";

/// Typed payload stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub email: String,
    pub authenticated: bool,
}

pub fn session_layer<Store: SessionStore + Clone>(
    cfg: &SessionConfig,
    store: Store,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(cfg.cookie_name.clone())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(cfg.secure_cookie)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(cfg.ttl_minutes)))
}

pub async fn load(session: &Session) -> Result<Option<SessionData>, tower_sessions::session::Error> {
    session.get::<SessionData>(SESSION_DATA_KEY).await
}

pub async fn store(
    session: &Session,
    data: &SessionData,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(SESSION_DATA_KEY, data).await
}
