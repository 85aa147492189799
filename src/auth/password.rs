use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Failure inside the Argon2 hasher, while parsing a stored hash, or in the blocking pool.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

fn hash_blocking(plain: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

fn verify_blocking(plain: &str, stored: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored).map_err(|e| HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Salted Argon2 PHC string for `plain`, computed off the async workers.
pub async fn hash_password(plain: &str) -> Result<String, HashError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .map_err(|e| HashError(e.to_string()))?
}

/// `Ok(false)` on mismatch; only an unreadable stored hash is an error.
pub async fn verify_password(plain: &str, stored: &str) -> Result<bool, HashError> {
    let (plain, stored) = (plain.to_owned(), stored.to_owned());
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .map_err(|e| HashError(e.to_string()))?
}
