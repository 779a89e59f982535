use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use models::user::EmergencyContact;

use crate::errors::ApiError;
use crate::routes::auth::AuthedUser;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct AddContactRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveContactRequest {
    pub contact_id: Option<String>,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub contact: EmergencyContact,
}

/// POST /contacts/add — appends to the caller's list; 400 once the limit
/// of five is reached.
pub async fn add(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Json(input): Json<AddContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let (name, phone) = match (input.name, input.phone) {
        (Some(n), Some(p)) if !n.is_empty() && !p.is_empty() => (n, p),
        _ => return Err(ApiError::Validation("Missing required fields".into())),
    };

    let contact = state.users.add_contact(&user_id, &name, &phone).await?;
    Ok(Json(ContactResponse { success: true, contact }))
}

/// POST /contacts/remove — only ids on the caller's own list can match.
pub async fn remove(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Json(input): Json<RemoveContactRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let contact_id = input
        .contact_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing contact ID".into()))?;

    let removed = state.users.remove_contact(&user_id, &contact_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Contact not found".into()));
    }
    Ok(Json(serde_json::json!({"success": true})))
}
