use std::collections::HashSet;
use std::env;
use std::fmt;
use std::time::Duration;

use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::auth::errors::AppIdError;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::AppSecret;

/// Value of `database.url` selecting the in-process store instead of PostgreSQL.
pub const IN_MEMORY_DATABASE: &str = "memory";

/// Longest accepted token time-to-live: one year.
pub const MAX_TOKEN_TTL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenConfig,
    pub hashing: HashingConfig,
    /// Applications provisioned into the in-memory store at startup
    #[serde(default)]
    pub apps: Vec<AppConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub grpc_port: u16,
    pub http_port: u16,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub ttl_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"***")
            .finish()
    }
}

impl AppConfig {
    pub fn to_app(&self) -> Result<App, AppIdError> {
        Ok(App {
            id: AppId::new(self.id)?,
            name: self.name.clone(),
            secret: AppSecret::new(self.secret.clone()),
        })
    }
}

fn default_env() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url == IN_MEMORY_DATABASE
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl TokenConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_secs)
    }
}

impl From<&HashingConfig> for HashingCost {
    fn from(config: &HashingConfig) -> Self {
        HashingCost {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SSO_DATABASE__URL, SSO_TOKEN__TTL_SECS, etc.)
    /// 2. Explicit config file (`--config` or CONFIG_PATH), if given
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_with(&run_mode, config_path)
    }

    pub fn load_with(run_mode: &str, config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Some(path) = config_path {
            // An explicitly named file must exist
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let configuration = builder
            // Example: SSO_DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("SSO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Applications to provision into an in-memory store.
    pub fn provisioned_apps(&self) -> Result<Vec<App>, AppIdError> {
        self.apps.iter().map(AppConfig::to_app).collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token.ttl_secs <= 0 || self.token.ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Message(format!(
                "token.ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }

        let mut app_ids = HashSet::new();
        for app in &self.apps {
            if app.id <= 0 {
                return Err(ConfigError::Message(format!(
                    "apps: id {} must be positive",
                    app.id
                )));
            }
            if app.secret.is_empty() {
                return Err(ConfigError::Message(format!(
                    "apps: secret of app {} is empty",
                    app.id
                )));
            }
            if !app_ids.insert(app.id) {
                return Err(ConfigError::Message(format!(
                    "apps: id {} is listed twice",
                    app.id
                )));
            }
        }

        Ok(())
    }
}
