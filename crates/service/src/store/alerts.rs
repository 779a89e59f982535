use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use models::alert::{AlertKind, EmergencyAlert, GeoPoint};
use models::ids::new_id;

/// In-memory alert store. Alerts are never persisted and never deleted;
/// they accumulate for the lifetime of the process.
pub struct AlertStore {
    inner: RwLock<HashMap<String, EmergencyAlert>>,
}

impl AlertStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(HashMap::new()) })
    }

    /// Record a new alert with the current timestamp. Always succeeds.
    pub async fn create(
        &self,
        user_id: &str,
        kind: AlertKind,
        lat: f64,
        lng: f64,
    ) -> EmergencyAlert {
        let alert = EmergencyAlert {
            id: new_id(),
            user_id: user_id.to_string(),
            kind,
            location: GeoPoint { lat, lng },
            timestamp: Utc::now().timestamp_millis(),
            alerts_sent: Vec::new(),
        };
        let mut alerts = self.inner.write().await;
        alerts.insert(alert.id.clone(), alert.clone());
        info!(alert_id = %alert.id, user_id = %alert.user_id, kind = ?alert.kind, "alert_created");
        alert
    }

    /// All alerts reported by the given user, in unspecified order.
    pub async fn for_user(&self, user_id: &str) -> Vec<EmergencyAlert> {
        let alerts = self.inner.read().await;
        alerts.values().filter(|a| a.user_id == user_id).cloned().collect()
    }

    /// Overwrite the sent-contact list. Records intent only; nothing is
    /// dispatched. `false` when the alert id is unknown.
    pub async fn mark_sent(&self, alert_id: &str, contact_ids: Vec<String>) -> bool {
        let mut alerts = self.inner.write().await;
        match alerts.get_mut(alert_id) {
            Some(alert) => {
                alert.alerts_sent = contact_ids;
                true
            }
            None => false,
        }
    }
}
