//! Storage abstractions for the service layer
//!
//! A single reusable file-backed map keeps the persistence pattern in one
//! place: the whole map is rewritten to disk on every mutation.

pub mod json_map_store;
