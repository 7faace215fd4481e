use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_CSV_FILE_PATH: &str = "data/sample.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the IP range CSV, loaded once at startup
    pub csv_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let address_str = get("HTTP_SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS);
        let address = address_str.trim().parse::<SocketAddr>().with_context(|| {
            format!("HTTP_SERVER_ADDRESS '{address_str}' is not a valid socket address")
        })?;

        let csv_path = get("CSV_FILE_PATH", DEFAULT_CSV_FILE_PATH);

        Ok(Config {
            server: ServerConfig { address },
            dataset: DatasetConfig { csv_path },
        })
    }
}
