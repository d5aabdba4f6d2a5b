use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: Option<String>,
    pub timeout: Duration,
    pub addr: SocketAddr,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("addr", &self.addr)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = get(API_KEY_VAR).map(|s| s.trim().to_string()).unwrap_or_default();
        if api_key.is_empty() {
            return Err(ConfigError::NotConfigured { var: API_KEY_VAR });
        }

        let api_base = get("OPENAI_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let timeout_secs = match get("SUMMARY_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { var: "SUMMARY_TIMEOUT_SECS", value: raw }),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw.clone() })?,
            None => 8080,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid { var: "HOST", value: host.clone() })?;

        Ok(Self { api_key, api_base, timeout: Duration::from_secs(timeout_secs), addr })
    }
}
