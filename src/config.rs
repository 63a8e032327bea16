use std::{fmt, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Whether messages live in one shared sequence or one sequence per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreScope {
    Global,
    #[default]
    PerUser,
}

impl FromStr for StoreScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(StoreScope::Global),
            "per_user" | "per-user" | "user" => Ok(StoreScope::PerUser),
            _ => Err(ConfigError::Invalid {
                key: "STORE_SCOPE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    #[default]
    Echo,
    Operator,
}

impl FromStr for ReplyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(ReplyMode::Echo),
            "operator" | "manual" => Ok(ReplyMode::Operator),
            _ => Err(ConfigError::Invalid {
                key: "REPLY_MODE",
                value: s.to_string(),
            }),
        }
    }
}

/// Wire contract of `POST /messages`.
///
/// `Reply` (v1) answers `{"reply": <content>}`; `Message` (v2) answers
/// `{"message": <Message>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseShape {
    #[default]
    Reply,
    Message,
}

impl FromStr for ResponseShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reply" | "v1" => Ok(ResponseShape::Reply),
            "message" | "v2" => Ok(ResponseShape::Message),
            _ => Err(ConfigError::Invalid {
                key: "RESPONSE_SHAPE",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseShape::Reply => write!(f, "v1 (reply)"),
            ResponseShape::Message => write!(f, "v2 (message)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub base_path: String,
    pub store_scope: StoreScope,
    pub reply_mode: ReplyMode,
    pub response_shape: ResponseShape,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            store_scope: StoreScope::default(),
            reply_mode: ReplyMode::default(),
            response_shape: ResponseShape::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the server settings from the environment (and `.env`, if the
    /// caller loaded it).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            base_path: lookup("API_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or(defaults.base_path),
            store_scope: parse_or("STORE_SCOPE", lookup("STORE_SCOPE"), defaults.store_scope)?,
            reply_mode: parse_or("REPLY_MODE", lookup("REPLY_MODE"), defaults.reply_mode)?,
            response_shape: parse_or(
                "RESPONSE_SHAPE",
                lookup("RESPONSE_SHAPE"),
                defaults.response_shape,
            )?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub base_path: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// An empty `API_BASE_URL` means "same origin", which for a process
    /// outside the browser is the local mock server.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let base_url = lookup("API_BASE_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        let timeout_ms = parse_or(
            "REQUEST_TIMEOUT_MS",
            lookup("REQUEST_TIMEOUT_MS"),
            DEFAULT_TIMEOUT.as_millis() as u64,
        )?;

        Ok(Self {
            base_url,
            base_path: lookup("API_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}

/// `api/` → `/api`, `/` → `` (routes mounted at the root).
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
