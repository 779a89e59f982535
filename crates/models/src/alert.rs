use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Category of a reported emergency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Medical,
    Accident,
    Fire,
    Disaster,
}

impl AlertKind {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "medical" => Ok(Self::Medical),
            "accident" => Ok(Self::Accident),
            "fire" => Ok(Self::Fire),
            "disaster" => Ok(Self::Disaster),
            other => Err(ModelError::Validation(format!("unknown alert type: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A reported emergency event. Held in process memory only; the sent list
/// records which contacts were targeted, not that anything was delivered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub location: GeoPoint,
    /// Unix milliseconds at creation.
    pub timestamp: i64,
    pub alerts_sent: Vec<String>,
}
