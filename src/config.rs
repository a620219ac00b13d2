use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_url: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,

    /// Insert a demo vendor, location and model into empty tables on startup.
    pub seed_demo: bool,

    /// Directory of `.sql` files overriding the built-in named queries.
    pub queries_dir: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/telecombase.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
            seed_demo: false,
            queries_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret for session tokens. When empty at startup a random
    /// per-process secret is generated, which invalidates tokens on restart.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Session token lifetime in seconds (default: 24h)
    pub token_ttl_seconds: u64,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_seconds: 24 * 60 * 60,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Environment variables win over the config file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("DATABASE_URL") {
            self.general.database_url = url;
        }

        if let Some(port) = non_empty("API_PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }

        if let Some(secret) = non_empty("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }

        if let Some(seed) = non_empty("SEED_DEMO") {
            self.general.seed_demo = matches!(
                seed.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        if let Some(dir) = non_empty("TELECOMBASE_SQL_DIR") {
            self.general.queries_dir = Some(dir.trim().to_string());
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("telecombase").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".telecombase").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.security.token_ttl_seconds == 0 {
            anyhow::bail!("Token TTL must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "min_db_connections ({}) exceeds max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.token_ttl_seconds, 86_400);
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.general.seed_demo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            jwt_secret = "from-file"
            token_ttl_seconds = 600
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.jwt_secret, "from-file");
        assert_eq!(config.security.token_ttl_seconds, 600);

        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_secret_is_never_serialized() {
        let mut config = Config::default();
        config.security.jwt_secret = "super-secret".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[security]"));
        assert!(!toml_str.contains("super-secret"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite:/tmp/inventory.db"),
            ("API_PORT", "9090"),
            ("JWT_SECRET", "env-secret"),
            ("SEED_DEMO", "Yes"),
            ("TELECOMBASE_SQL_DIR", " /opt/sql "),
        ]);

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.general.database_url, "sqlite:/tmp/inventory.db");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.security.jwt_secret, "env-secret");
        assert!(config.general.seed_demo);
        assert_eq!(config.general.queries_dir.as_deref(), Some("/opt/sql"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "JWT_SECRET").then(|| "   ".to_string()));
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_pool_bounds() {
        let mut config = Config::default();
        config.general.min_db_connections = 10;
        config.general.max_db_connections = 2;
        assert!(config.validate().is_err());
    }
}
