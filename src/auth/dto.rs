use serde::Deserialize;

/// Form body for `POST /user/login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Form body for `POST /user/logout`.
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    pub email: Option<String>,
}
