use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::auth::AdminPassword;
use crate::kernel::GPT_4O_MINI;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_model: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// From `ADMIN_PASSWORD_SHA256` (hex digest) or, failing that, `ADMIN_PASSWORD`
    pub admin_password: AdminPassword,
    pub allowed_origins: Vec<String>,
    /// Seconds between view-count buffer flushes
    pub view_flush_interval_secs: u64,
    /// Maximum number of cards returned by the directory listing
    pub directory_page_limit: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| GPT_4O_MINI.to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "siam-portal".to_string()),
            admin_password: admin_password_from(
                env::var("ADMIN_PASSWORD").ok(),
                env::var("ADMIN_PASSWORD_SHA256").ok(),
            )?,
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            view_flush_interval_secs: env::var("VIEW_FLUSH_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("VIEW_FLUSH_INTERVAL_SECS must be a whole number of seconds")?,
            directory_page_limit: env::var("DIRECTORY_PAGE_LIMIT")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("DIRECTORY_PAGE_LIMIT must be a valid number")?,
        })
    }
}

/// A digest wins over a plain password so the secret never has to sit in
/// the environment.
fn admin_password_from(plain: Option<String>, sha256_hex: Option<String>) -> Result<AdminPassword> {
    match (plain, sha256_hex) {
        (_, Some(digest)) => AdminPassword::from_hex_digest(&digest)
            .context("ADMIN_PASSWORD_SHA256 must be a 64-character hex SHA-256 digest"),
        (Some(plain), None) => Ok(AdminPassword::new(&plain)),
        (None, None) => bail!("ADMIN_PASSWORD or ADMIN_PASSWORD_SHA256 must be set"),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
