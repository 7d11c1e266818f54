//! Authority configuration

use serde::{Deserialize, Serialize};
use vault_core::{CoreError, VaultConfig};

/// Tunables for [`crate::ChunkActionAuthority`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Attempts at a mailbox read-modify-write before giving up with
    /// `ModifyFailure`. Each attempt re-reads the record.
    pub cas_retry_limit: u32,

    /// Number of leading name bytes rendered in logs and error messages
    pub log_name_prefix: usize,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            cas_retry_limit: 64,
            log_name_prefix: 8,
        }
    }
}

impl VaultConfig for AuthorityConfig {
    const ENV_PREFIX: &'static str = "VAULT_AUTHORITY_";

    fn set_from_string(&mut self, key: &str, value: &str) -> vault_core::Result<()> {
        match key {
            "cas_retry_limit" => {
                self.cas_retry_limit = value
                    .parse()
                    .map_err(|e| CoreError::config(format!("cas_retry_limit: {e}")))?;
            }
            "log_name_prefix" => {
                self.log_name_prefix = value
                    .parse()
                    .map_err(|e| CoreError::config(format!("log_name_prefix: {e}")))?;
            }
            other => {
                return Err(CoreError::config(format!(
                    "Unknown authority setting: {other}"
                )))
            }
        }
        Ok(())
    }

    fn validate(&self) -> vault_core::Result<()> {
        if self.cas_retry_limit == 0 {
            return Err(CoreError::config("cas_retry_limit must be at least 1"));
        }
        if self.log_name_prefix == 0 {
            return Err(CoreError::config("log_name_prefix must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AuthorityConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = AuthorityConfig::from_toml_str("cas_retry_limit = 3").unwrap();
        assert_eq!(config.cas_retry_limit, 3);
        assert_eq!(config.log_name_prefix, 8);
    }

    #[test]
    fn zero_retries_rejected() {
        assert!(AuthorityConfig::from_toml_str("cas_retry_limit = 0").is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = AuthorityConfig::default();
        config
            .merge_with_vars(vec![(
                "VAULT_AUTHORITY_LOG_NAME_PREFIX".to_string(),
                "4".to_string(),
            )])
            .unwrap();
        assert_eq!(config.log_name_prefix, 4);

        let err = config.merge_with_vars(vec![(
            "VAULT_AUTHORITY_BOGUS".to_string(),
            "1".to_string(),
        )]);
        assert!(err.is_err());
    }

    #[test]
    fn process_environment_overrides() {
        std::env::set_var("VAULT_AUTHORITY_CAS_RETRY_LIMIT", "7");
        let mut config = AuthorityConfig::default();
        let merged = config.merge_with_env();
        std::env::remove_var("VAULT_AUTHORITY_CAS_RETRY_LIMIT");

        merged.unwrap();
        assert_eq!(config.cas_retry_limit, 7);
        assert_eq!(config.log_name_prefix, 8);
    }
}
