//! Domain types shared across the service and HTTP layers.
//!
//! Field names serialize as camelCase so the persisted user blob and the
//! JSON wire format stay compatible with existing clients.

pub mod alert;
pub mod errors;
pub mod ids;
pub mod user;
