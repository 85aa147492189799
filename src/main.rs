use anyhow::Context;
use dice_online::{app, state::AppState};
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SESSION_SWEEP_SECS: u64 = 60;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dice_online=debug,axum=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => registry.with(fmt::layer().json().with_target(false)).init(),
        _ => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init().await?;

    // The users table may also be managed outside this service.
    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "users migration failed; continuing");
    }

    let sessions = PostgresStore::new(state.db.clone());
    sessions.migrate().await.context("migrate session store")?;
    let sweeper = tokio::task::spawn(
        sessions
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(SESSION_SWEEP_SECS)),
    );

    let listen_addr = state.config.listen_addr.clone();
    let served = app::serve(app::build_app(state, sessions), &listen_addr).await;
    sweeper.abort();
    served
}
