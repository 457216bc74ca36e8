use dotenvy::{dotenv, from_filename, var};
use std::path::PathBuf;

use super::constants::{
    DEFAULT_API_PORT, DEFAULT_BASE_CURRENCY, DEFAULT_DATA_DIR, DEFAULT_FROM_CURRENCY,
    DEFAULT_RATES_API_URL, DEFAULT_TO_CURRENCY,
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub rates_api_url: String,
    pub base_currency: String,
    pub default_from: String,
    pub default_to: String,
    pub data_dir: PathBuf,
    pub api_port: u16,
    pub api_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rates_api_url: DEFAULT_RATES_API_URL.to_string(),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            default_from: DEFAULT_FROM_CURRENCY.to_string(),
            default_to: DEFAULT_TO_CURRENCY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            api_port: DEFAULT_API_PORT,
            api_token: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(get_env_variable)
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_port = match non_empty("API_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("API_PORT '{}' is not a valid port: {}", port, e))?,
            None => defaults.api_port,
        };

        Ok(Settings {
            rates_api_url: non_empty("RATES_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.rates_api_url),
            base_currency: non_empty("BASE_CURRENCY").unwrap_or(defaults.base_currency),
            default_from: non_empty("DEFAULT_FROM").unwrap_or(defaults.default_from),
            default_to: non_empty("DEFAULT_TO").unwrap_or(defaults.default_to),
            data_dir: non_empty("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            api_port,
            api_token: non_empty("API_TOKEN"),
        })
    }
}

pub fn check_for_env_variables(settings: &Settings) {
    match get_env_variable("RATES_API_URL") {
        Some(_) => tracing::info!("Rates API URL set ✅ ({})", settings.rates_api_url),
        None => tracing::info!(
            "RATES_API_URL not set, using {} ⚠️",
            settings.rates_api_url
        ),
    };
    match settings.api_token {
        Some(_) => tracing::info!("API token set ✅"),
        None => tracing::info!("No API token set, the API will accept every request. ⚠️"),
    };
    tracing::info!("History is stored in {:?}", settings.data_dir);
}

pub fn get_env_variable(variable_to_get: &str) -> Option<String> {
    let environment = var("RUST_ENV").unwrap_or_else(|_| "development".into());

    match environment.as_str() {
        "development" => from_filename(".env.dev").ok(),
        "production" => from_filename(".env.prod").ok(),
        _ => dotenv().ok(),
    };
    var(variable_to_get).ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.rates_api_url, DEFAULT_RATES_API_URL);
        assert_eq!(settings.base_currency, "USD");
        assert_eq!(settings.default_to, "EUR");
        assert_eq!(settings.api_port, 8084);
        assert!(settings.api_token.is_none());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("RATES_API_URL", "http://localhost:9000/v4/"),
            ("DATA_DIR", "/tmp/fx"),
            ("API_PORT", "9090"),
            ("API_TOKEN", "  "),
        ]))
        .unwrap();
        assert_eq!(settings.rates_api_url, "http://localhost:9000/v4");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/fx"));
        assert_eq!(settings.api_port, 9090);
        assert!(settings.api_token.is_none());
    }

    #[test]
    fn rejects_invalid_port() {
        let result = Settings::from_lookup(lookup_from(&[("API_PORT", "http")]));
        assert!(result.is_err());
    }
}
