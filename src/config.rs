/*
 * Responsibility
 * - 環境変数や設定の読み込み (INTROSPECT_URI, AUTHZ_ENABLED, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Token-introspection endpoint of the authorization server. Taken
    /// as-is; a bad value surfaces on the first guarded request, not here.
    pub introspect_uri: String,
    /// `false` turns every check into a no-op (local/test environments).
    pub authz_enabled: bool,
    /// Roles that satisfy any route's policy, regardless of what the route
    /// itself requires.
    pub global_granted_roles: Vec<Role>,
    pub introspect_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let introspect_uri =
            std::env::var("INTROSPECT_URI").map_err(|_| ConfigError::Missing("INTROSPECT_URI"))?;

        let authz_enabled = match std::env::var("AUTHZ_ENABLED") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTHZ_ENABLED"))?,
            Err(_) => true,
        };

        // Unknown role names fail startup instead of silently granting
        // nothing.
        let global_granted_roles = match std::env::var("AUTHZ_GLOBAL_ROLES") {
            Ok(v) => parse_roles(&v).map_err(|_| ConfigError::Invalid("AUTHZ_GLOBAL_ROLES"))?,
            Err(_) => Vec::new(),
        };

        let introspect_timeout = Duration::from_secs(
            std::env::var("INTROSPECT_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
        );

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            introspect_uri,
            authz_enabled,
            global_granted_roles,
            introspect_timeout,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_roles(csv: &str) -> Result<Vec<Role>, crate::services::auth::roles::UnknownRole> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Role::from_str)
        .collect()
}
