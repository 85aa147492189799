use std::fmt::Display;

use axum::http::StatusCode;
use tracing::{error, warn};

use crate::users::error::RepoError;

pub type HandlerError = (StatusCode, String);

pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed")
}

pub fn bad_request() -> HandlerError {
    (StatusCode::BAD_REQUEST, "400 Bad Request".into())
}

/// Log `e` with `context`; the client only sees a fixed 500 body.
pub fn internal_error<E: Display>(e: E, context: &str) -> HandlerError {
    error!(error = %e, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".into(),
    )
}

/// Form value that counts as supplied: present and non-empty.
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Log a repository failure with `context` and turn it into a response.
pub fn repo_failure(e: RepoError, context: &str) -> HandlerError {
    match e {
        RepoError::NotFound => {
            warn!(error = %e, "{}", context);
            (StatusCode::NOT_FOUND, "User not found".into())
        }
        RepoError::ConstraintViolation(_) => {
            warn!(error = %e, "{}", context);
            (StatusCode::CONFLICT, "Email already registered".into())
        }
        RepoError::MissingId => {
            warn!(error = %e, "{}", context);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        RepoError::Connection(_) | RepoError::Hashing(_) => internal_error(e, context),
    }
}
