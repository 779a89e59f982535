use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::user::PublicUser;

use crate::errors::ApiError;
use crate::routes::AppState;

/// User id resolved by `require_session`, injected into request extensions.
#[derive(Clone, Debug)]
pub struct AuthedUser(pub String);

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.split_whitespace().nth(1))
}

/// Middleware for routes that need a live session. Resolves the bearer
/// token against the registry and stores the user id in request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Auth("Unauthorized".into()))?
        .to_string();

    let user_id = state
        .sessions
        .validate(&token)
        .await
        .ok_or_else(|| ApiError::Auth("Invalid or expired token".into()))?;

    req.extensions_mut().insert(AuthedUser(user_id));
    Ok(next.run(req).await)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: PublicUser,
    pub token: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: PublicUser,
}

fn required(field: Option<String>) -> Result<String, ApiError> {
    match field {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation("Missing required fields".into())),
    }
}

/// POST /auth/register — create the user and open a session in one step.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let email = required(input.email)?;
    let name = required(input.name)?;
    let password = required(input.password)?;

    let user = state.users.create_user(&email, &name, &password).await?;
    let token = state.sessions.create_session(&user.id).await;

    info!(user_id = %user.id, "user_registered");
    Ok(Json(SessionResponse { success: true, user: user.public(), token }))
}

/// POST /auth/login — plaintext password comparison by contract; a single
/// message covers both unknown email and wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let email = required(input.email)?;
    let password = required(input.password)?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .filter(|u| u.password == password)
        .ok_or_else(|| ApiError::Auth("Invalid email or password".into()))?;

    let token = state.sessions.create_session(&user.id).await;
    info!(user_id = %user.id, "user_logged_in");
    Ok(Json(SessionResponse { success: true, user: user.public(), token }))
}

/// GET /auth/verify — session already checked by the middleware; the user
/// record can still be gone if the blob was wiped underneath us.
pub async fn verify(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let user = state
        .users
        .get(&user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(VerifyResponse { success: true, user: user.public() }))
}

/// POST /auth/logout — unconditional removal; succeeds even for tokens the
/// registry has never seen or has already expired.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| ApiError::Auth("Unauthorized".into()))?;
    state.sessions.logout(token).await;
    Ok(Json(serde_json::json!({"success": true})))
}
