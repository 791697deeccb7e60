use std::net::SocketAddr;

use crate::utils::error::{AppError, AppResult};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";

/// What the NFT status sync answers when no work matches the given id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingWorkPolicy {
    /// Succeed with empty data.
    #[default]
    Ignore,
    /// Answer 404, as the blockchain-info update does.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo { uri: String, db_name: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: Option<String>,
    pub store: StoreConfig,
    pub missing_work_policy: MissingWorkPolicy,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr: SocketAddr = server_addr.parse().map_err(|_| {
            AppError::InternalError(format!("Failed to parse SERVER_ADDR: {}", server_addr))
        })?;

        let store = match var("STORE_BACKEND").as_deref().unwrap_or("mongo") {
            "mongo" => StoreConfig::Mongo {
                uri: var("MONGO_URI").ok_or_else(|| {
                    AppError::InternalError("MONGO_URI must be set in .env".to_string())
                })?,
                db_name: var("DB_NAME").ok_or_else(|| {
                    AppError::InternalError("DB_NAME must be set in .env".to_string())
                })?,
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(AppError::InternalError(format!(
                    "Unknown STORE_BACKEND: {} (expected mongo or memory)",
                    other
                )))
            }
        };

        let missing_work_policy = match var("NFT_SYNC_MISSING_WORK").as_deref() {
            None | Some("ignore") => MissingWorkPolicy::Ignore,
            Some("reject") => MissingWorkPolicy::Reject,
            Some(other) => {
                return Err(AppError::InternalError(format!(
                    "Unknown NFT_SYNC_MISSING_WORK: {} (expected ignore or reject)",
                    other
                )))
            }
        };

        Ok(Config {
            server_addr,
            cors_origin: var("CORS_ORIGIN"),
            store,
            missing_work_policy,
        })
    }
}
