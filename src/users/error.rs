use crate::auth::password::HashError;

/// Failures surfaced by a [`UserRepository`](super::repo::UserRepository).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database error: {0}")]
    Connection(sqlx::Error),
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error("user id is required")]
    MissingId,
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                RepoError::ConstraintViolation(db.message().to_string())
            }
            other => RepoError::Connection(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::NotFound
        ));
    }

    #[test]
    fn pool_errors_map_to_connection() {
        let err = RepoError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Connection(_)));
        assert!(err.to_string().starts_with("database error"));
    }
}
