use crate::errors::{CoreError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Core trait for vault configuration types
pub trait VaultConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Environment variable prefix, e.g. `VAULT_AUTHORITY_`.
    const ENV_PREFIX: &'static str;

    /// Parse and validate a TOML document
    fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply every `ENV_PREFIX`-prefixed environment variable as an override
    fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an explicit `(NAME, value)` list.
    ///
    /// Names are matched after stripping `ENV_PREFIX` and lowercasing.
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(field) = key.strip_prefix(Self::ENV_PREFIX) {
                self.set_from_string(&field.to_lowercase(), &value)?;
            }
        }
        self.validate()
    }

    /// Set a single field from its string form
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<()>;

    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}
