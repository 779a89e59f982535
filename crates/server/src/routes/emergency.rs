use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::alert::{AlertKind, GeoPoint};

use crate::errors::ApiError;
use crate::routes::auth::bearer_token;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub maps_link: Option<String>,
    #[serde(default)]
    pub contact_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub location: GeoPoint,
    pub contacts_alerted: usize,
}

#[derive(Serialize)]
pub struct AlertResponse {
    pub success: bool,
    pub alert: AlertSummary,
}

/// POST /emergency/alert — records the alert and the intent to notify the
/// given contacts; nothing is actually dispatched.
///
/// A bearer header must be present but is NOT validated against the
/// session registry. The existing clients rely on that behavior, so it is
/// kept as-is rather than silently tightened.
pub async fn alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    if bearer_token(&headers).is_none() {
        return Err(ApiError::Auth("Unauthorized".into()));
    }

    let (user_id, kind, latitude, longitude) =
        match (input.user_id, input.kind, input.latitude, input.longitude) {
            (Some(u), Some(k), Some(lat), Some(lng)) if !u.is_empty() && !k.is_empty() => {
                (u, k, lat, lng)
            }
            _ => return Err(ApiError::Validation("Missing required fields".into())),
        };
    let kind = AlertKind::parse(&kind).map_err(|e| ApiError::Validation(e.to_string()))?;

    let alert = state.alerts.create(&user_id, kind, latitude, longitude).await;
    state.alerts.mark_sent(&alert.id, input.contact_ids.clone()).await;

    // Stand-in for real dispatch (SMS, emergency services).
    info!(
        alert_id = %alert.id,
        kind = ?alert.kind,
        lat = latitude,
        lng = longitude,
        maps_link = input.maps_link.as_deref().unwrap_or(""),
        contacts_alerted = input.contact_ids.len(),
        "emergency_alert"
    );

    Ok(Json(AlertResponse {
        success: true,
        alert: AlertSummary {
            id: alert.id,
            kind: alert.kind,
            location: alert.location,
            contacts_alerted: input.contact_ids.len(),
        },
    }))
}
