//! Entity store: users with their emergency contacts (file-backed) and
//! emergency alerts (process memory only).

pub mod alerts;
pub mod users;

pub use alerts::AlertStore;
pub use users::UserStore;
