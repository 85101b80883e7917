// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Application configuration loaded from environment variables.
//!
//! Read once at startup and shared read-only for the life of the process.

use chrono::FixedOffset;
use std::env;

/// Signing secret used only when `APP_ENV=development` and `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "ptmate-development-secret-do-not-deploy";

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid("APP_ENV", other.to_string())),
        }
    }
}

/// Which document store backs the `Db` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Firestore,
    Memory,
}

/// Credentials for the S3-compatible (Cloudflare R2) photo bucket.
#[derive(Debug, Clone)]
pub struct R2Config {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Public URL prefix for stored objects; empty when the bucket is private.
    pub public_url: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// JWT signing key for bearer tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub database_backend: DatabaseBackend,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Zone used for the dashboard's "today" and "this week" windows
    pub timezone: FixedOffset,
    /// `None` when photo storage is not configured.
    pub r2: Option<R2Config>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            database_backend: DatabaseBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            timezone: FixedOffset::east_opt(3 * 3600).expect("valid offset"),
            r2: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Outside development, a missing `JWT_SECRET` is a startup error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = Environment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
        )?;

        let jwt_signing_key = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().as_bytes().to_vec(),
            _ if environment == Environment::Development => {
                tracing::warn!("JWT_SECRET not set; using the development signing secret");
                DEV_JWT_SECRET.as_bytes().to_vec()
            }
            _ => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let database_backend = match env::var("DATABASE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => DatabaseBackend::Firestore,
            "memory" => DatabaseBackend::Memory,
            other => return Err(ConfigError::Invalid("DATABASE_BACKEND", other.to_string())),
        };

        let tz_raw = env::var("TIMEZONE_OFFSET").unwrap_or_else(|_| "+03:00".to_string());
        let timezone = crate::time_utils::parse_offset(&tz_raw)
            .ok_or(ConfigError::Invalid("TIMEZONE_OFFSET", tz_raw))?;

        Ok(Self {
            environment,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key,
            database_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            timezone,
            r2: r2_from_env(),
        })
    }
}

/// Storage counts as configured only when account and both keys are present.
fn r2_from_env() -> Option<R2Config> {
    let read = |name: &str| env::var(name).map(|v| v.trim().to_string()).unwrap_or_default();

    let account_id = read("R2_ACCOUNT_ID");
    let access_key_id = read("R2_ACCESS_KEY_ID");
    let secret_access_key = read("R2_SECRET_ACCESS_KEY");
    if account_id.is_empty() || access_key_id.is_empty() || secret_access_key.is_empty() {
        return None;
    }

    let bucket = match read("R2_BUCKET_NAME") {
        b if b.is_empty() => "ptmate-photos".to_string(),
        b => b,
    };

    Some(R2Config {
        account_id,
        access_key_id,
        secret_access_key,
        bucket,
        public_url: read("R2_PUBLIC_URL").trim_end_matches('/').to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
