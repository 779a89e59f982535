use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::{runtime, session::SessionRegistry, store::AlertStore, store::UserStore};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => configs::AppConfig::default(),
    }
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.server.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.server.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Build application state: file-backed users, in-memory alerts, and the
/// session registry.
pub async fn build_state(cfg: &configs::AppConfig) -> anyhow::Result<AppState> {
    runtime::ensure_env(&cfg.storage.data_dir).await?;
    let users = UserStore::open(cfg.users_path()).await?;
    let alerts = AlertStore::new();
    let sessions = SessionRegistry::with_ttl_hours(cfg.session.ttl_hours);
    Ok(AppState { users, alerts, sessions })
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();
    let state = build_state(&cfg).await?;

    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting emergency api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
