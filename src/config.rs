// src/config.rs - Configuration: TOML file, .env file and environment overrides
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub keep_alive: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub max_request_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Where the pre-built single-page client lives, if this process serves it.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FrontendConfig {
    pub build_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            workers: None,
            keep_alive: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:warehouse.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_request_size: 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = if let Ok(config_file) = env::var("CONFIG_FILE") {
        Config::from_file(Path::new(&config_file))?
    } else {
        Config::default()
    };

    apply_overrides(&mut config, |key| env::var(key).ok());

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Overrides file/default values with whatever `lookup` returns for the known keys.
/// Unparseable numeric values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("BIND_ADDRESS") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.server.port = port;
    }
    if let Some(workers) = lookup("WORKERS").and_then(|v| v.parse::<usize>().ok()) {
        config.server.workers = Some(workers);
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(max_conn) = lookup("DATABASE_MAX_CONNECTIONS").and_then(|v| v.parse::<u32>().ok()) {
        config.database.max_connections = max_conn;
    }
    if let Some(min_conn) = lookup("DATABASE_MIN_CONNECTIONS").and_then(|v| v.parse::<u32>().ok()) {
        config.database.min_connections = min_conn;
    }
    if let Some(origins) = lookup("ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(size) = lookup("MAX_REQUEST_SIZE").and_then(|v| v.parse::<usize>().ok()) {
        config.security.max_request_size = size;
    }
    if let Some(level) = lookup("RUST_LOG") {
        config.logging.level = level;
    }
    if let Some(dir) = lookup("FRONTEND_BUILD_DIR") {
        config.frontend.build_dir = Some(dir).filter(|d| !d.trim().is_empty());
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(anyhow::anyhow!(
                "max_connections ({}) must be >= min_connections ({})",
                self.database.max_connections,
                self.database.min_connections
            ));
        }

        if self.security.max_request_size == 0 {
            anyhow::bail!("security.max_request_size must be non-zero");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn print_startup_info(&self) {
        log::info!("🏭 Warehouse inventory API starting up...");
        log::info!("🌐 Server: {}", self.bind_address());
        log::info!("💾 Database: {}", self.database.url);
        log::info!("📊 Logging: {} level", self.logging.level);

        match self.frontend.build_dir {
            Some(ref dir) => log::info!("🖥️  Serving frontend from {}", dir),
            None => log::info!("🖥️  Frontend serving disabled"),
        }

        if self.security.allowed_origins.iter().any(|o| o == "*") {
            log::warn!("⚠️  CORS allows any origin");
        }
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}
