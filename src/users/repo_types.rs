use serde::Serialize;
use sqlx::FromRow;

/// Row shape of the public columns of `users`.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub highscore: i64,
}

/// Public view of a player account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "HighScore", skip_serializing_if = "Option::is_none")]
    pub highscore: Option<i64>, // None when not read back from storage
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            username: r.username,
            highscore: Some(r.highscore),
        }
    }
}

/// Partial update. `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>, // plaintext, hashed only when present
    pub highscore: Option<i64>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.highscore.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_user_serializes_without_highscore() {
        let user = User {
            id: 7,
            email: "a@x.com".into(),
            username: "alice".into(),
            highscore: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ID": 7, "Email": "a@x.com", "Username": "alice"})
        );
    }

    #[test]
    fn stored_user_serializes_highscore() {
        let user = User::from(UserRow {
            id: 1,
            email: "a@x.com".into(),
            username: "alice".into(),
            highscore: 0,
        });
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"HighScore\":0"));
        assert!(!json.to_lowercase().contains("password"));
    }
}
