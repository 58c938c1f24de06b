//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::types::{InsightsError, Result};

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_DATA_PATH: &str = "data/sales.csv";

/// Origins always allowed by CORS (local frontend dev servers)
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Resolved settings for one server process
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub data_path: PathBuf,
    pub allowed_origins: Vec<String>,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            allowed_origins: allowed_origins(None),
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn new(
        bind: &str,
        data_path: PathBuf,
        frontend_origin: Option<&str>,
        log_json: bool,
    ) -> Result<Self> {
        Ok(Self {
            bind: parse_bind(bind)?,
            data_path,
            allowed_origins: allowed_origins(frontend_origin),
            log_json,
        })
    }
}

/// Build the CORS allow-list: the dev origins plus an optional production origin.
/// Blank values are dropped.
pub fn allowed_origins(frontend_origin: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|o| o.to_string())
        .collect();
    if let Some(origin) = frontend_origin.map(str::trim).filter(|o| !o.is_empty()) {
        origins.push(origin.to_string());
    }
    origins
}

pub fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|e| InsightsError::Config(format!("invalid bind addr {}: {}", raw, e)))
}
