use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub app_name: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: "pickupscan".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            // Relaxed for the in-browser scanner; restrict in production.
            cors_allowed_origins: vec!["*".to_string()],
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/pickupscan.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key for signing session cookies. Must be at least 64 bytes; deploys
    /// must override the placeholder default.
    pub secret: String,

    /// Sessions expire after this many minutes of inactivity.
    pub expiry_minutes: i64,
}

/// Placeholder signing secret. `Config::validate` warns when it is still in
/// use so a deployment cannot silently ship it.
const PLACEHOLDER_SESSION_SECRET: &str =
    "CHANGE_ME_TO_A_LONG_RANDOM_SECRET_AT_LEAST_SIXTY_FOUR_BYTES_LONG__";

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: PLACEHOLDER_SESSION_SECRET.to_string(),
            expiry_minutes: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("pickupscan").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pickupscan").join("config.toml"));
        }

        paths
    }

    /// Environment variables win over the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("PICKUPSCAN_APP_NAME") {
            self.general.app_name = name;
        }
        if let Ok(level) = std::env::var("PICKUPSCAN_LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Ok(port) = std::env::var("PICKUPSCAN_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("PICKUPSCAN_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("PICKUPSCAN_SESSION_SECRET") {
            self.session.secret = secret;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.session.secret.len() < 64 {
            anyhow::bail!("Session secret must be at least 64 bytes");
        }

        if self.session.secret == PLACEHOLDER_SESSION_SECRET {
            tracing::warn!("Using the placeholder session secret; do not deploy this to production");
        }

        if self.session.expiry_minutes <= 0 {
            anyhow::bail!("Session expiry must be > 0 minutes");
        }

        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            anyhow::bail!("Database pool bounds are invalid");
        }

        Ok(())
    }
}
