use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::auth::password::hash_password;
use crate::users::{
    error::RepoError,
    repo_types::{User, UserRow, UserUpdate},
};

/// Data access for the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<User, RepoError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepoError>;
    /// Stored password hash for `email`. Only the login flow should need this.
    async fn get_password(&self, email: &str) -> Result<String, RepoError>;
    async fn get_all(&self) -> Result<Vec<User>, RepoError>;
    /// Hash `password` and insert a new row. The returned user carries no highscore.
    async fn create(&self, email: &str, password: &str, username: &str)
        -> Result<User, RepoError>;
    async fn update(&self, id: i64, changes: UserUpdate) -> Result<User, RepoError>;
    /// Remove the row and return its email.
    async fn delete(&self, id: i64) -> Result<String, RepoError>;
}

async fn hash_new_password(password: Option<&str>) -> Result<Option<String>, RepoError> {
    match password {
        Some(plain) => Ok(Some(hash_password(plain).await?)),
        None => Ok(None),
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, id: i64) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, highscore
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, highscore
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn get_password(&self, email: &str) -> Result<String, RepoError> {
        let (password,) = sqlx::query_as::<_, (String,)>(
            r#"SELECT password FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(password)
    }

    async fn get_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, highscore
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, RepoError> {
        let hash = hash_password(password).await?;
        let (id,) = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO users (email, username, password)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(&hash)
        .fetch_one(&self.db)
        .await?;
        debug!(user_id = id, "user row inserted");
        Ok(User {
            id,
            email: email.to_string(),
            username: username.to_string(),
            highscore: None,
        })
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<User, RepoError> {
        if id == 0 {
            return Err(RepoError::MissingId);
        }
        let password = hash_new_password(changes.password.as_deref()).await?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
               SET email     = COALESCE($1, email),
                   username  = COALESCE($2, username),
                   password  = COALESCE($3, password),
                   highscore = COALESCE($4, highscore)
             WHERE id = $5
            RETURNING id, email, username, highscore
            "#,
        )
        .bind(changes.email)
        .bind(changes.username)
        .bind(password)
        .bind(changes.highscore)
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<String, RepoError> {
        let (email,) = sqlx::query_as::<_, (String,)>(
            r#"DELETE FROM users WHERE id = $1 RETURNING email"#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        Ok(email)
    }
}
