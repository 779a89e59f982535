use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted JSON blobs.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// File name of the serialized user mapping inside `data_dir`.
    #[serde(default = "default_users_file")]
    pub users_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), users_file: default_users_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in hours; expiry is checked lazily on validation.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_hours: default_ttl_hours() }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_users_file() -> String { "users.json".into() }
fn default_ttl_hours() -> i64 { 24 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Full path of the users blob, `<data_dir>/<users_file>`.
    pub fn users_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.storage.data_dir).join(&self.storage.users_file)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 {
                self.worker_threads = Some(4);
            }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Allow the data directory to come from the environment when the TOML
    /// omits it.
    pub fn normalize_from_env(&mut self) {
        if self.data_dir.trim().is_empty() {
            if let Ok(dir) = std::env::var("DATA_DIR") {
                self.data_dir = dir;
            } else {
                self.data_dir = default_data_dir();
            }
        }
        if self.users_file.trim().is_empty() {
            self.users_file = default_users_file();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty"));
        }
        if self.users_file.contains('/') || self.users_file.contains("..") {
            return Err(anyhow!("storage.users_file must be a bare file name"));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ttl_hours <= 0 {
            return Err(anyhow!("session.ttl_hours must be positive"));
        }
        Ok(())
    }
}
