use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{session::SessionRegistry, store::AlertStore, store::UserStore};

pub mod auth;
pub mod contacts;
pub mod emergency;

/// Shared application state; explicit object passed to handlers instead of
/// process globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub alerts: Arc<AlertStore>,
    pub sessions: Arc<SessionRegistry>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
///
/// `/emergency/alert` sits outside the session middleware on purpose: the
/// handler requires a bearer header but does not check it against the
/// registry, matching the existing client contract.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/emergency/alert", post(emergency::alert));

    let protected = Router::new()
        .route("/auth/verify", get(auth::verify))
        .route("/contacts/add", post(contacts::add))
        .route("/contacts/remove", post(contacts::remove))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
