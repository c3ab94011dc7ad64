//! Environment-driven server configuration.

use std::net::SocketAddr;

use notify_core::BroadcasterConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated list, or `*` for any origin.
    pub allowed_origins: String,
    pub chat_capacity: usize,
    pub broadcaster: BroadcasterConfig,
    /// `RUST_LOG` directives for the tracing subscriber.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: "*".to_string(),
            chat_capacity: 256,
            broadcaster: BroadcasterConfig::default(),
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

impl ServerConfig {
    /// Load configuration from the process environment, after `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("SERVER_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.port = parse("SERVER_PORT", port)?;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            config.allowed_origins = origins;
        }
        if let Some(capacity) = lookup("CHAT_CHANNEL_CAPACITY") {
            config.chat_capacity = parse("CHAT_CHANNEL_CAPACITY", capacity)?;
        }
        if let Some(secs) = lookup("BROADCASTER_HEARTBEAT_SECS") {
            config.broadcaster = config
                .broadcaster
                .with_heartbeat_interval(parse("BROADCASTER_HEARTBEAT_SECS", secs)?);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }
        if let Some(evict) = lookup("BROADCASTER_EVICT_FAILED") {
            config.broadcaster = config
                .broadcaster
                .with_eviction(parse_flag("BROADCASTER_EVICT_FAILED", evict)?);
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "SERVER_HOST",
                value: self.host.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() -> Result<(), ConfigError> {
        let config = ServerConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr()?.port(), 8080);
        assert_eq!(config.log_filter, "info,tower_http=debug");
        Ok(())
    }

    #[test]
    fn reads_every_variable() -> Result<(), ConfigError> {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "3001"),
            ("ALLOWED_ORIGINS", "https://app.example"),
            ("CHAT_CHANNEL_CAPACITY", "64"),
            ("BROADCASTER_HEARTBEAT_SECS", "15"),
            ("BROADCASTER_EVICT_FAILED", "true"),
            ("RUST_LOG", "debug"),
        ]))?;
        assert_eq!(config.addr()?.to_string(), "127.0.0.1:3001");
        assert_eq!(config.allowed_origins, "https://app.example");
        assert_eq!(config.chat_capacity, 64);
        assert_eq!(config.broadcaster.heartbeat_interval_secs, Some(15));
        assert!(config.broadcaster.evict_failed_subscribers);
        assert_eq!(config.log_filter, "debug");
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[("SERVER_PORT", "http")])),
            Err(ConfigError::Invalid {
                name: "SERVER_PORT",
                value: "http".to_string()
            })
        );
        assert!(ServerConfig::from_lookup(lookup(&[("BROADCASTER_EVICT_FAILED", "maybe")])).is_err());
    }
}
