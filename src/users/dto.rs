use serde::{Deserialize, Serialize};

/// Query string for `GET /user`. Parsed by hand so a bad id is a 400, not a rejection.
#[derive(Debug, Deserialize)]
pub struct FetchUserQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of `PATCH /user`. Empty or absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub highscore: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedUser {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Email")]
    pub email: String,
}
