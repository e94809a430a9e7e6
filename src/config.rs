use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Google Sheets access; absent when the sheet credentials are not set.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub api_key: String,
    pub range: String,
    pub fetch_timeout_secs: u64,
}

/// What the live channel sends on a tick whose snapshot matches the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushMode {
    Always,
    OnChange,
}

impl std::str::FromStr for PushMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(PushMode::Always),
            "on_change" | "on-change" => Ok(PushMode::OnChange),
            other => anyhow::bail!("unknown push mode `{other}` (expected `always` or `on_change`)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub poll_secs: u64,
    pub push_mode: PushMode,
}

impl FeedConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.poll_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_retry_secs: u64,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub production: bool,
    pub sheet: Option<SheetConfig>,
    pub feed: FeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "sheetsync".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "sheetsync-users".into()),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60),
        };

        let sheet = match (
            std::env::var("GOOGLE_SHEET_ID"),
            std::env::var("GOOGLE_API_KEY"),
        ) {
            (Ok(sheet_id), Ok(api_key)) if !sheet_id.is_empty() && !api_key.is_empty() => {
                Some(SheetConfig {
                    sheet_id,
                    api_key,
                    range: std::env::var("SHEET_RANGE")
                        .unwrap_or_else(|_| "Sheet1!A1:Z100".into()),
                    fetch_timeout_secs: parse_or("SHEET_FETCH_TIMEOUT_SECS", 10),
                })
            }
            _ => None,
        };

        let push_mode = match std::env::var("SHEET_PUSH_MODE") {
            Ok(v) => v.parse().context("invalid SHEET_PUSH_MODE")?,
            Err(_) => PushMode::Always,
        };

        Ok(Self {
            database_url,
            db_retry_secs: parse_or("DB_RETRY_SECS", 5),
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 5000),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            production: std::env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            sheet,
            feed: FeedConfig {
                poll_secs: parse_or("SHEET_POLL_SECS", 5),
                push_mode,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
