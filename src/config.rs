//! Configuration for the conversion CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (jsonschema2rdf.toml)
//! - Environment variables (JSONSCHEMA2RDF_*)
//!
//! ## Example config file (jsonschema2rdf.toml):
//! ```toml
//! [conversion]
//! base_uri = "https://data.example.org/model"
//! skolem_base = "https://data.example.org"
//! deterministic = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::uri::DEFAULT_SKOLEM_BASE;

/// Main configuration for the converter
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConvertConfig {
    /// Conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Base namespace URI minted identifiers live under. Usually given
    /// on the command line; a configured value serves as the default.
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Base URI for skolemized identifiers
    #[serde(default = "default_skolem_base")]
    pub skolem_base: String,

    /// Mint sequential skolem identifiers instead of random ones, for
    /// reproducible output
    #[serde(default)]
    pub deterministic: bool,
}

fn default_skolem_base() -> String {
    DEFAULT_SKOLEM_BASE.to_string()
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            skolem_base: default_skolem_base(),
            deterministic: false,
        }
    }
}

impl ConvertConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["jsonschema2rdf.toml", ".jsonschema2rdf.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("JSONSCHEMA2RDF")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.conversion.base_uri, None);
        assert_eq!(config.conversion.skolem_base, DEFAULT_SKOLEM_BASE);
        assert!(!config.conversion.deterministic);
    }
}
