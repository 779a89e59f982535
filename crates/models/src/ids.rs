use uuid::Uuid;

/// Random opaque identifier for users, contacts, and alerts.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
