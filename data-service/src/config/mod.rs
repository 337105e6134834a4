use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/";

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Upper bound on server selection, so an unreachable host fails startup instead of hanging.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

impl DataConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(DataConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some(DEFAULT_MONGODB_URI), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("data_service"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("data"), is_prod)?,
                connect_timeout_secs: get_env("MONGODB_CONNECT_TIMEOUT_SECS", Some("5"), is_prod)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "MONGODB_CONNECT_TIMEOUT_SECS is not a number: {}",
                            e
                        ))
                    })?,
            },
            store: get_env("STORE_BACKEND", Some("mongodb"), is_prod)?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
