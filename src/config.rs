// config.rs
use std::path::PathBuf;
use std::str::FromStr;

use dotenv::dotenv;
use tracing_subscriber::filter::LevelFilter;

use crate::{
    models::agentmodel::ReferenceData,
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub default_currency: String,
    pub reference_data_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    // Exchanges whose valuation match reaches this percentage count as fair
    pub fair_exchange_threshold: u8,
    // Fallbacks taken while loading, logged once the subscriber is installed
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_currency: "INR".to_string(),
            reference_data_path: None,
            log_level: LevelFilter::INFO,
            fair_exchange_threshold: 90,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    pub fn init() -> Config {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Missing or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let mut warnings = Vec::new();

        let default_currency = lookup("DEFAULT_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.default_currency);

        let reference_data_path = lookup("REFERENCE_DATA_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let log_level = match lookup("LOG_LEVEL") {
            Some(raw) => LevelFilter::from_str(raw.trim()).unwrap_or_else(|_| {
                warnings.push(format!(
                    "Invalid LOG_LEVEL '{}', using {}",
                    raw, defaults.log_level
                ));
                defaults.log_level
            }),
            None => defaults.log_level,
        };

        let fair_exchange_threshold = match lookup("FAIR_EXCHANGE_THRESHOLD") {
            Some(raw) => match raw.trim().parse::<u8>() {
                Ok(threshold) if threshold <= 100 => threshold,
                _ => {
                    warnings.push(format!(
                        "Invalid FAIR_EXCHANGE_THRESHOLD '{}', using {}",
                        raw, defaults.fair_exchange_threshold
                    ));
                    defaults.fair_exchange_threshold
                }
            },
            None => defaults.fair_exchange_threshold,
        };

        Config {
            default_currency,
            reference_data_path,
            log_level,
            fair_exchange_threshold,
            warnings,
        }
    }

    /// Reference data from `REFERENCE_DATA_PATH`, or the built-in catalogue when unset.
    pub fn load_reference_data(&self) -> Result<ReferenceData, ServiceError> {
        match &self.reference_data_path {
            Some(path) => {
                let reference = ReferenceData::from_json_file(path)?;
                tracing::info!(
                    "✅ Loaded {} agents and {} property types from {}",
                    reference.agents.len(),
                    reference.property_types.len(),
                    path.display()
                );
                Ok(reference)
            }
            None => Ok(ReferenceData::builtin()),
        }
    }
}

/// Installs the fmt subscriber at the configured level, then reports any config fallbacks.
/// Safe to call more than once.
pub fn init_tracing(config: &Config) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .try_init();

    for warning in &config.warnings {
        tracing::warn!("⚠️ {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.default_currency, "INR");
        assert!(config.reference_data_path.is_none());
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert_eq!(config.fair_exchange_threshold, 90);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DEFAULT_CURRENCY", "aed"),
            ("REFERENCE_DATA_PATH", "/etc/enquiry-desk/reference.json"),
            ("LOG_LEVEL", "debug"),
            ("FAIR_EXCHANGE_THRESHOLD", "95"),
        ]));
        assert_eq!(config.default_currency, "AED");
        assert_eq!(
            config.reference_data_path,
            Some(PathBuf::from("/etc/enquiry-desk/reference.json"))
        );
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert_eq!(config.fair_exchange_threshold, 95);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "chatty"),
            ("FAIR_EXCHANGE_THRESHOLD", "150"),
            ("DEFAULT_CURRENCY", "  "),
        ]));
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert_eq!(config.fair_exchange_threshold, 90);
        assert_eq!(config.default_currency, "INR");
        assert_eq!(
            config.warnings,
            vec![
                "Invalid LOG_LEVEL 'chatty', using info".to_string(),
                "Invalid FAIR_EXCHANGE_THRESHOLD '150', using 90".to_string(),
            ]
        );
    }

    #[test]
    fn test_init_tracing_reports_fallbacks() {
        let config = Config::from_lookup(lookup_from(&[("LOG_LEVEL", "chatty")]));
        assert_eq!(config.warnings.len(), 1);
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn test_load_reference_data() {
        let builtin = Config::default().load_reference_data().unwrap();
        assert_eq!(builtin, ReferenceData::builtin());

        let missing = Config {
            reference_data_path: Some(PathBuf::from("/nonexistent/enquiry-desk/reference.json")),
            ..Config::default()
        };
        assert_eq!(missing.load_reference_data().unwrap_err().kind(), "reference_data");
    }
}
