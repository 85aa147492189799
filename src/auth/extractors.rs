use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_sessions::Session;
use tracing::warn;

use super::session::{load, SessionData};
use crate::responses::{internal_error, HandlerError};

/// The caller's own session, required to be authenticated.
pub struct AuthSession {
    pub session: Session,
    pub data: SessionData,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;

        let data = load(&session)
            .await
            .map_err(|e| internal_error(e, "session load failed"))?;

        match data {
            Some(data) if data.authenticated => Ok(AuthSession { session, data }),
            _ => {
                warn!("session missing or not authenticated");
                Err((StatusCode::UNAUTHORIZED, "Login required".into()))
            }
        }
    }
}
