//! Application config: log file, catalog endpoint and refresh, store identity, history cap.
//! Loaded from env; LLM settings are loaded separately by [`llm_client::EnvLlmConfig`] so that
//! `search` works without an API key.

use anyhow::Result;
use std::env;
use std::time::Duration;

use prompt::{PromptConfig, DEFAULT_PRODUCT_BASE_URL, DEFAULT_STORE_NAME};

pub const DEFAULT_LOG_FILE: &str = "logs/shopbot.log";
pub const DEFAULT_CATALOG_URL: &str = "https://matias95ap.github.io/novacenter/tienda/productos.json";
pub const DEFAULT_CATALOG_REFRESH_MINUTES: u64 = 30;
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_HISTORY: usize = 10;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// LOG_FILE
    pub log_file: String,
    /// CATALOG_URL: JSON array of products
    pub catalog_url: String,
    /// CATALOG_REFRESH_MINUTES: snapshot age after which the next message triggers a refresh
    pub catalog_refresh_minutes: u64,
    /// CATALOG_TIMEOUT_SECS
    pub catalog_timeout_secs: u64,
    /// PRODUCT_BASE_URL: product code is appended percent-encoded
    pub product_base_url: String,
    /// STORE_NAME
    pub store_name: String,
    /// MAX_HISTORY: turns kept per customer
    pub max_history: usize,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid number: {}", name, raw)),
        _ => Ok(default),
    }
}

impl BotConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            log_file: var_or("LOG_FILE", DEFAULT_LOG_FILE),
            catalog_url: var_or("CATALOG_URL", DEFAULT_CATALOG_URL),
            catalog_refresh_minutes: parsed_or(
                "CATALOG_REFRESH_MINUTES",
                DEFAULT_CATALOG_REFRESH_MINUTES,
            )?,
            catalog_timeout_secs: parsed_or("CATALOG_TIMEOUT_SECS", DEFAULT_CATALOG_TIMEOUT_SECS)?,
            product_base_url: var_or("PRODUCT_BASE_URL", DEFAULT_PRODUCT_BASE_URL),
            store_name: var_or("STORE_NAME", DEFAULT_STORE_NAME),
            max_history: parsed_or("MAX_HISTORY", DEFAULT_MAX_HISTORY)?,
        })
    }

    /// URLs must parse; refresh interval, timeout and history cap must be positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("CATALOG_URL", &self.catalog_url),
            ("PRODUCT_BASE_URL", &self.product_base_url),
        ] {
            if reqwest::Url::parse(value).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, value);
            }
        }
        if self.catalog_refresh_minutes == 0 {
            anyhow::bail!("CATALOG_REFRESH_MINUTES must be greater than 0");
        }
        if self.catalog_timeout_secs == 0 {
            anyhow::bail!("CATALOG_TIMEOUT_SECS must be greater than 0");
        }
        if self.max_history == 0 {
            anyhow::bail!("MAX_HISTORY must be greater than 0");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.catalog_refresh_minutes * 60)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn prompt_config(&self) -> PromptConfig {
        PromptConfig {
            store_name: self.store_name.clone(),
            product_base_url: self.product_base_url.clone(),
            ..PromptConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "LOG_FILE",
        "CATALOG_URL",
        "CATALOG_REFRESH_MINUTES",
        "CATALOG_TIMEOUT_SECS",
        "PRODUCT_BASE_URL",
        "STORE_NAME",
        "MAX_HISTORY",
    ];

    fn clear_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();

        let config = BotConfig::load().unwrap();

        assert_eq!(config.log_file, "logs/shopbot.log");
        assert_eq!(config.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.refresh_interval(), Duration::from_secs(30 * 60));
        assert_eq!(config.catalog_timeout(), Duration::from_secs(30));
        assert_eq!(config.product_base_url, "https://www.novacenter.ar/tienda/?producto=");
        assert_eq!(config.store_name, "Nova Center");
        assert_eq!(config.max_history, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("CATALOG_URL", "http://localhost:8080/productos.json");
        env::set_var("CATALOG_REFRESH_MINUTES", "5");
        env::set_var("STORE_NAME", "Tienda Demo");
        env::set_var("MAX_HISTORY", "4");

        let config = BotConfig::load().unwrap();
        clear_env();

        assert_eq!(config.catalog_url, "http://localhost:8080/productos.json");
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.max_history, 4);
        let prompt = config.prompt_config();
        assert_eq!(prompt.store_name, "Tienda Demo");
        assert_eq!(prompt.product_base_url, DEFAULT_PRODUCT_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_load_rejects_non_numeric_limits() {
        clear_env();
        env::set_var("MAX_HISTORY", "diez");

        let err = BotConfig::load().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("MAX_HISTORY"));
    }

    #[test]
    #[serial]
    fn test_validate_rejects_invalid_values() {
        clear_env();
        let mut config = BotConfig::load().unwrap();

        config.catalog_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.catalog_url = DEFAULT_CATALOG_URL.to_string();
        config.max_history = 0;
        assert!(config.validate().is_err());

        config.max_history = 10;
        config.catalog_refresh_minutes = 0;
        assert!(config.validate().is_err());
    }
}
