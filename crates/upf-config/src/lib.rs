use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// How local F-SEIDs are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeidAllocation {
    /// Monotonic counter, wrapping back to `seid_start`
    #[default]
    Sequential,
    Random,
}

/// Per-association session table settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SessionConfig {
    /// Pre-allocated capacity of each PDR/FAR/QER container
    #[validate(range(min = 1))]
    pub max_items: usize,
    pub seid_allocation: SeidAllocation,
    #[validate(range(min = 1))]
    pub seid_start: u64,
    #[validate(range(min = 1))]
    pub max_seid_retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_items: upf_shared::MAX_ITEMS,
            seid_allocation: SeidAllocation::Sequential,
            seid_start: 1,
            max_seid_retries: 16,
        }
    }
}

/// Common application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpfConfig {
    #[validate(length(min = 1))]
    pub service_name: String,
    #[validate(length(min = 1))]
    pub log_level: String,
    #[validate(range(min = 1, max = 65535))]
    pub metrics_port: u16,
    #[serde(default)]
    #[validate(nested)]
    pub session: SessionConfig,
}

impl Default for UpfConfig {
    fn default() -> Self {
        Self {
            service_name: "pfcpiface".to_string(),
            log_level: "info".to_string(),
            metrics_port: 8080,
            session: SessionConfig::default(),
        }
    }
}

/// Load configuration from file
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("UPF").separator("__"))
        .build()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?;

    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

/// Load configuration from YAML string (for testing)
pub fn load_from_yaml<T>(yaml: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::LoadError(e.to_string()))?;
    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UpfConfig::default();
        assert_eq!(config.service_name, "pfcpiface");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session.max_items, 10);
        assert_eq!(config.session.seid_allocation, SeidAllocation::Sequential);
        assert_eq!(config.session.seid_start, 1);
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
service_name: upf-test
log_level: debug
metrics_port: 9100
session:
  max_items: 32
  seid_allocation: random
"#;
        let config: UpfConfig = load_from_yaml(yaml).unwrap();
        assert_eq!(config.service_name, "upf-test");
        assert_eq!(config.metrics_port, 9100);
        assert_eq!(config.session.max_items, 32);
        assert_eq!(config.session.seid_allocation, SeidAllocation::Random);
        // omitted fields fall back to defaults
        assert_eq!(config.session.max_seid_retries, 16);
    }

    #[test]
    fn test_session_section_optional() {
        let yaml = r#"
service_name: upf-test
log_level: info
metrics_port: 9100
"#;
        let config: UpfConfig = load_from_yaml(yaml).unwrap();
        assert_eq!(config.session.max_items, upf_shared::MAX_ITEMS);
    }

    #[test]
    fn test_validation_error() {
        let yaml = r#"
service_name: upf-test
log_level: info
metrics_port: 9100
session:
  seid_start: 0
"#;
        let result: Result<UpfConfig, _> = load_from_yaml(yaml);
        match result {
            Err(ConfigError::ValidationError(_)) => (), // Expected
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let config = SessionConfig {
            max_items: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
