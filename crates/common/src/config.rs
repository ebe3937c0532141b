//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default ceiling for uploaded source and translated files
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Administrator account created at startup when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// JWT verification
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    /// File storage
    pub upload_dir: String,
    pub max_file_size_mb: u64,

    /// HTTP
    pub cors_allowed_origins: Vec<String>,

    /// Initial administrator (ADMIN_EMAIL + ADMIN_PASSWORD)
    pub admin_bootstrap: Option<AdminBootstrap>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let max_file_size_mb = match env::var("MAX_FILE_SIZE_MB") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a positive integer"))?,
            Err(_) => DEFAULT_MAX_FILE_SIZE_MB,
        };

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_file_size_mb,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),

            admin_bootstrap: admin_bootstrap_from_env()?,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "lingodesk=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }

    /// File-size ceiling in bytes
    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

fn admin_bootstrap_from_env() -> Result<Option<AdminBootstrap>> {
    let email = env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty());
    let password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok(Some(AdminBootstrap {
            name: env::var("ADMIN_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Administrator".to_string()),
            email,
            password,
        })),
        (None, None) => Ok(None),
        _ => Err(anyhow::anyhow!(
            "ADMIN_EMAIL and ADMIN_PASSWORD must be set together"
        )),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
