use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    routing::post,
    Form, Router,
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, LogoutForm},
        password::verify_password,
        session::{self, SessionData},
    },
    responses::{bad_request, internal_error, method_not_allowed, repo_failure, required, HandlerError},
    state::AppState,
    users::error::RepoError,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user/login", post(login).fallback(method_not_allowed))
        .route("/user/logout", post(logout).fallback(method_not_allowed))
}

fn invalid_credentials() -> HandlerError {
    (StatusCode::UNAUTHORIZED, "Invalid credentials".into())
}

/// POST /user/login with `email`, `password`
///
/// The caller always gets a freshly issued session id, whatever cookie it sent.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<&'static str, HandlerError> {
    let Ok(Form(form)) = form else {
        warn!("login with unreadable form");
        return Err(bad_request());
    };
    let (Some(email), Some(password)) = (required(form.email), required(form.password)) else {
        warn!("login missing required field");
        return Err(bad_request());
    };

    let stored = match state.users.get_password(&email).await {
        Ok(hash) => hash,
        Err(RepoError::NotFound) => {
            warn!(email = %email, "login unknown email");
            return Err(invalid_credentials());
        }
        Err(e) => return Err(repo_failure(e, "get_password failed")),
    };

    let ok = verify_password(&password, &stored)
        .await
        .map_err(|e| internal_error(e, "verify_password failed"))?;
    if !ok {
        warn!(email = %email, "login invalid password");
        return Err(invalid_credentials());
    }

    session
        .cycle_id()
        .await
        .map_err(|e| internal_error(e, "session cycle failed"))?;
    let data = SessionData {
        email: email.clone(),
        authenticated: true,
    };
    session::store(&session, &data)
        .await
        .map_err(|e| internal_error(e, "session save failed"))?;

    info!(email = %email, "user logged in");
    Ok("Logged In.")
}

/// POST /user/logout with `email`
///
/// Only the caller's own session is touched, and only when it belongs to `email`.
#[instrument(skip_all)]
pub async fn logout(
    session: Session,
    form: Result<Form<LogoutForm>, FormRejection>,
) -> Result<StatusCode, HandlerError> {
    let Some(email) = form.ok().and_then(|Form(f)| required(f.email)) else {
        warn!("logout without email");
        return Err(bad_request());
    };

    let current = session::load(&session)
        .await
        .map_err(|e| internal_error(e, "session load failed"))?;
    match current {
        Some(mut data) if data.email == email => {
            data.authenticated = false;
            session::store(&session, &data)
                .await
                .map_err(|e| internal_error(e, "session save failed"))?;
            info!(email = %email, "user logged out");
        }
        _ => info!(email = %email, "logout without a matching session"),
    }
    Ok(StatusCode::OK)
}
