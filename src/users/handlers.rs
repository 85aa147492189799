use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CreateUserForm, DeletedUser, FetchUserQuery, UpdateUserForm};
use super::repo_types::{User, UserUpdate};
use crate::{
    auth::{
        extractors::AuthSession,
        session::{self, SessionData},
    },
    responses::{bad_request, internal_error, method_not_allowed, repo_failure, required, HandlerError},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(fetch_user)
                .post(create_user)
                .patch(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
        .route("/users", get(list_users).fallback(method_not_allowed))
}

/// GET /user?id=<n>
#[instrument(skip(state, query))]
pub async fn fetch_user(
    State(state): State<AppState>,
    query: Result<Query<FetchUserQuery>, QueryRejection>,
) -> Result<Json<User>, HandlerError> {
    let id = query
        .ok()
        .and_then(|Query(q)| q.id)
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| {
            warn!("fetch_user without a valid id");
            bad_request()
        })?;

    let user = state
        .users
        .get(id)
        .await
        .map_err(|e| repo_failure(e, "get user failed"))?;
    Ok(Json(user))
}

/// POST /user with `email`, `username`, `password`
#[instrument(skip(state, form))]
pub async fn create_user(
    State(state): State<AppState>,
    form: Result<Form<CreateUserForm>, FormRejection>,
) -> Result<Json<User>, HandlerError> {
    let Ok(Form(form)) = form else {
        warn!("create_user with unreadable form");
        return Err(bad_request());
    };
    let (Some(email), Some(username), Some(password)) = (
        required(form.email),
        required(form.username),
        required(form.password),
    ) else {
        warn!("create_user missing required field");
        return Err(bad_request());
    };

    let user = state
        .users
        .create(&email, &password, &username)
        .await
        .map_err(|e| repo_failure(e, "create user failed"))?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(Json(user))
}

/// GET /users (authenticated)
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthSession,
) -> Result<Json<Vec<User>>, HandlerError> {
    let users = state
        .users
        .get_all()
        .await
        .map_err(|e| repo_failure(e, "list users failed"))?;
    Ok(Json(users))
}

fn parse_update(form: UpdateUserForm) -> Result<UserUpdate, HandlerError> {
    let highscore = match required(form.highscore) {
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            warn!(highscore = %raw, "highscore is not an integer");
            bad_request()
        })?),
        None => None,
    };
    let changes = UserUpdate {
        email: required(form.email),
        username: required(form.username),
        password: required(form.password),
        highscore,
    };
    if changes.is_empty() {
        warn!("update_user without any field");
        return Err(bad_request());
    }
    Ok(changes)
}

/// PATCH /user (authenticated): change any of the caller's own fields
#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthSession { session, data }: AuthSession,
    form: Result<Form<UpdateUserForm>, FormRejection>,
) -> Result<Json<User>, HandlerError> {
    let Ok(Form(form)) = form else {
        warn!("update_user with unreadable form");
        return Err(bad_request());
    };
    let changes = parse_update(form)?;

    let current = state
        .users
        .get_by_email(&data.email)
        .await
        .map_err(|e| repo_failure(e, "resolve session user failed"))?;
    let user = state
        .users
        .update(current.id, changes)
        .await
        .map_err(|e| repo_failure(e, "update user failed"))?;

    if user.email != data.email {
        let moved = SessionData {
            email: user.email.clone(),
            authenticated: true,
        };
        session::store(&session, &moved)
            .await
            .map_err(|e| internal_error(e, "session save failed"))?;
    }

    info!(user_id = user.id, "user updated");
    Ok(Json(user))
}

/// DELETE /user (authenticated): remove the caller's account and end the session
#[instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthSession { session, data }: AuthSession,
) -> Result<Json<DeletedUser>, HandlerError> {
    let current = state
        .users
        .get_by_email(&data.email)
        .await
        .map_err(|e| repo_failure(e, "resolve session user failed"))?;
    let email = state
        .users
        .delete(current.id)
        .await
        .map_err(|e| repo_failure(e, "delete user failed"))?;

    session
        .flush()
        .await
        .map_err(|e| internal_error(e, "session flush failed"))?;

    info!(user_id = current.id, "user deleted");
    Ok(Json(DeletedUser {
        id: current.id,
        email,
    }))
}
