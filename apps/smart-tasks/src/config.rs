use core_config::{ConfigError, Environment, FromEnv, StorageConfig};
use domain_tasks::GeminiConfig;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub storage: StorageConfig,
    /// `None` when no API key is set; suggestions are then disabled
    pub gemini: Option<GeminiConfig>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A missing API key only disables suggestions. Malformed values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini = match GeminiConfig::from_env() {
            Ok(config) => Some(config),
            Err(ConfigError::MissingEnvVar(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            environment: Environment::from_env(),
            storage: StorageConfig::from_env()?,
            gemini,
        })
    }
}
