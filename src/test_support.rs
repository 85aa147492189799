//! Helpers for driving the real router in unit tests.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use crate::{
    app::build_app,
    state::AppState,
    users::repo::{memory::MemoryUserRepository, UserRepository},
};

pub(crate) struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::default());
        let mut state = AppState::fake();
        state.users = users.clone() as Arc<dyn UserRepository>;
        Self {
            router: build_app(state.clone(), MemoryStore::default()),
            state,
            users,
        }
    }
}

pub(crate) fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn send(router: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body)
}

pub(crate) async fn send_with_cookie(
    router: &Router,
    mut req: Request<Body>,
    cookie: &str,
) -> (StatusCode, HeaderMap, Bytes) {
    req.headers_mut()
        .insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    send(router, req).await
}

/// Registers a@x.com / alice / secret and returns the new id.
pub(crate) async fn create_alice(app: &TestApp) -> i64 {
    let (status, _, body) = send(
        &app.router,
        form_request(
            Method::POST,
            "/user",
            "email=a%40x.com&username=alice&password=secret",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user: serde_json::Value = serde_json::from_slice(&body).unwrap();
    user["ID"].as_i64().unwrap()
}

pub(crate) fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = format!("email={}&password={}", email.replace('@', "%40"), password);
    form_request(Method::POST, "/user/login", &body)
}

/// Logs in and returns the `name=value` pair to send back as a `Cookie` header.
pub(crate) async fn login_cookie(app: &TestApp, email: &str, password: &str) -> String {
    let (status, headers, _) = send(&app.router, login_request(email, password)).await;
    assert_eq!(status, StatusCode::OK);
    set_cookie_pair(&headers)
}

/// Registers b@x.com / bob / hunter2 and returns the new id.
pub(crate) async fn create_bob(app: &TestApp) -> i64 {
    let (status, _, body) = send(
        &app.router,
        form_request(
            Method::POST,
            "/user",
            "email=b%40x.com&username=bob&password=hunter2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user: serde_json::Value = serde_json::from_slice(&body).unwrap();
    user["ID"].as_i64().unwrap()
}

pub(crate) fn set_cookie_pair(headers: &HeaderMap) -> String {
    let raw = headers[header::SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}
