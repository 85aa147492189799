use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::auth::session::session_layer;
use crate::responses::method_not_allowed;
use crate::state::AppState;
use crate::{auth, users};

/// Full router. Sessions live in `store`; cookies follow `state.config.session`.
pub fn build_app<Store: SessionStore + Clone>(state: AppState, store: Store) -> Router {
    let sessions = session_layer(&state.config.session, store);
    Router::new()
        .merge(users::router())
        .merge(auth::router())
        .route("/health", get(|| async { "ok" }).fallback(method_not_allowed))
        .with_state(state)
        .layer(sessions)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        status = tracing::field::Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                        let status = res.status();
                        span.record("status", status.as_u16());
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(latency_ms, "request failed");
                        } else {
                            tracing::info!(latency_ms, "request served");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, listen_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "dice-online listening");
    axum::serve(listener, app).await?;
    Ok(())
}
