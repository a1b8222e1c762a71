use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub store_path: String,

    // Logging
    pub log_dir: String,
    pub log_level: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_write_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_addr: text("SERVER_ADDR", "127.0.0.1:8080"),
            store_path: text("STORE_PATH", "data/hrm-store.json"),

            log_dir: text("LOG_DIR", "logs"),
            log_level: text("LOG_LEVEL", "debug"),

            rate_protected_per_min: parse_var(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,
            rate_write_per_min: parse_var(&lookup, "RATE_WRITE_PER_MIN", 120)?,

            api_prefix: text("API_PREFIX", "/api"),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.store_path, "data/hrm-store.json");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.rate_protected_per_min, 1000);
        assert_eq!(config.rate_write_per_min, 120);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_PATH", "/tmp/hr.json"),
            ("RATE_WRITE_PER_MIN", " 30 "),
        ]))
        .unwrap();
        assert_eq!(config.store_path, "/tmp/hr.json");
        assert_eq!(config.rate_write_per_min, 30);
    }

    #[test]
    fn bad_numbers_are_errors() {
        let err = Config::from_lookup(lookup(&[("RATE_PROTECTED_PER_MIN", "lots")])).unwrap_err();
        assert!(err.to_string().contains("RATE_PROTECTED_PER_MIN"));
    }
}
