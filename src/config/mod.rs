use crate::error::{HarborError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Runtime environment of the application
///
/// Only `Development` turns on verbose diagnostics (stack traces and the
/// interactive trace page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppEnvironment {
    #[strum(to_string = "development", serialize = "dev", serialize = "local")]
    Development,
    #[default]
    #[strum(to_string = "production", serialize = "prod")]
    Production,
    #[strum(to_string = "test", serialize = "testing")]
    Test,
}

impl AppEnvironment {
    pub fn is_development(self) -> bool {
        matches!(self, AppEnvironment::Development)
    }

    /// Parse an environment name, rejecting unknown values
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| HarborError::InvalidEnvironment {
            value: value.to_string(),
        })
    }
}

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Keys consulted, in order, for the application environment
    pub const ENVIRONMENT_KEYS: [&'static str; 2] = ["APP_ENV", "NODE_ENV"];

    pub fn new() -> Self {
        let service = Self::empty();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    /// A service that ignores the process environment
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Split a comma separated value into trimmed, non-empty items
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve the application environment.
    ///
    /// A missing value means production. An unknown value is logged and also
    /// treated as production so diagnostics are never exposed by accident.
    pub fn environment(&self) -> AppEnvironment {
        let Some(raw) = Self::ENVIRONMENT_KEYS
            .iter()
            .find_map(|key| self.get(key))
        else {
            return AppEnvironment::default();
        };

        match AppEnvironment::parse(&raw) {
            Ok(environment) => environment,
            Err(e) => {
                tracing::warn!("{}, falling back to production", e);
                AppEnvironment::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_production() {
        let config = ConfigService::empty();
        assert_eq!(config.environment(), AppEnvironment::Production);
        assert!(!config.environment().is_development());
    }

    #[test]
    fn test_environment_aliases() {
        let config = ConfigService::empty();
        config.set("NODE_ENV", "dev");
        assert_eq!(config.environment(), AppEnvironment::Development);

        config.set("APP_ENV", "Testing");
        assert_eq!(config.environment(), AppEnvironment::Test);
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        assert!(matches!(
            AppEnvironment::parse("staging"),
            Err(HarborError::InvalidEnvironment { .. })
        ));

        let config = ConfigService::empty();
        config.set("APP_ENV", "staging");
        assert_eq!(config.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_get_list() {
        let config = ConfigService::empty();
        config.set("CODES", " E_A, ,E_B ");
        assert_eq!(config.get_list("CODES"), vec!["E_A", "E_B"]);
        assert!(config.get_list("MISSING").is_empty());
        assert_eq!(config.get_or("MISSING", "x"), "x");
    }
}
