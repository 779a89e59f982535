//! Business layer for the emergency-assistance backend.
//! - `store` holds users, contacts, and alerts on top of the JSON blob storage.
//! - `session` issues and validates bearer tokens in process memory.
//! - Provides clear error types independent of the web framework.

pub mod errors;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod store;
