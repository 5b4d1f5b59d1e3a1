/*
 * Responsibility
 * - 環境変数や設定の読み込み (署名シークレット、必要ロール、HTTP 制限値など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ読み込み、以降は read-only で共有する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::services::auth::SecretEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Signing secret. Never printed.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub access_token_secret: Secret,
    pub access_token_secret_encoding: SecretEncoding,
    pub access_token_leeway_seconds: u64,

    // Role demanded by the admin routes (exact, case-sensitive match)
    pub admin_required_role: String,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 8000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let access_token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .map(Secret)
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let access_token_secret_encoding =
            parse_secret_encoding(lookup("ACCESS_TOKEN_SECRET_ENCODING").as_deref())?;

        let access_token_leeway_seconds: u64 =
            parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let admin_required_role = lookup("ADMIN_REQUIRED_ROLE")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "ROLE_ADMIN".to_string());
        if admin_required_role.is_empty() {
            return Err(ConfigError::Invalid("ADMIN_REQUIRED_ROLE"));
        }

        let request_timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes: usize =
            parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            access_token_secret,
            access_token_secret_encoding,
            access_token_leeway_seconds,
            admin_required_role,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

/// Unset → `default`; set but unparsable → `ConfigError::Invalid(key)`.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_secret_encoding(raw: Option<&str>) -> Result<SecretEncoding, ConfigError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("base64") => Ok(SecretEncoding::Base64),
        Some("raw") => Ok(SecretEncoding::Raw),
        Some(_) => Err(ConfigError::Invalid("ACCESS_TOKEN_SECRET_ENCODING")),
    }
}
