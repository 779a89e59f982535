//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can call
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data directory exists before stores open their blobs.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_dir).await
}
