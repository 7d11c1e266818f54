//! Configuration loading for vault components
//!
//! Configurations are plain serde structs. They are read from TOML, can be
//! overridden field-by-field from prefixed environment variables, and are
//! validated before use.

mod traits;

pub use traits::VaultConfig;
