//! Runtime configuration from environment variables.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_ATTACK_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_ATTACK_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub geocoder_url: String,
    pub attack_url: String,
    pub attack_model: String,
    /// Bearer token for the attack-command service. Attack resolution
    /// reports a service failure when absent.
    pub api_key: Option<String>,
    /// Country centroid file (GeoJSON or prepared records).
    pub countries_path: Option<PathBuf>,
    pub frame_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            attack_url: DEFAULT_ATTACK_URL.to_string(),
            attack_model: DEFAULT_ATTACK_MODEL.to_string(),
            api_key: None,
            countries_path: None,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let frame_rate = match get("WARGLOBE_FRAME_RATE") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(rate) if rate > 0 => rate,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "WARGLOBE_FRAME_RATE",
                        value,
                    })
                }
            },
            None => defaults.frame_rate,
        };

        Ok(Self {
            geocoder_url: get("WARGLOBE_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            attack_url: get("WARGLOBE_ATTACK_URL").unwrap_or(defaults.attack_url),
            attack_model: get("WARGLOBE_ATTACK_MODEL").unwrap_or(defaults.attack_model),
            api_key: get("OPENAI_API_KEY"),
            countries_path: get("WARGLOBE_COUNTRIES").map(PathBuf::from),
            frame_rate,
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
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.frame_rate, 60);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WARGLOBE_ATTACK_MODEL", "gpt-4o-mini"),
            ("OPENAI_API_KEY", "sk-test"),
            ("WARGLOBE_COUNTRIES", "/data/countries.json"),
            ("WARGLOBE_FRAME_RATE", "30"),
        ]))
        .unwrap();
        assert_eq!(config.attack_model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.countries_path,
            Some(PathBuf::from("/data/countries.json"))
        );
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_empty_key_counts_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_bad_frame_rate() {
        let err = AppConfig::from_lookup(lookup(&[("WARGLOBE_FRAME_RATE", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "WARGLOBE_FRAME_RATE",
                value: "0".to_string()
            }
        );
    }
}
