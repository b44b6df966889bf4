//! Configuration loading and validation.
//!
//! All values are read from environment variables once, at startup, and the
//! resulting [`Config`] is passed to whatever needs it. Nothing in this crate
//! reads the environment after that.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::key::{provider::parse_hex_key, ExecutionMode, KeyProvider};

/// Validated configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Explicit 256-bit key as 64 hex characters. Mandatory in production.
    #[serde(default)]
    pub store_encryption_key: Option<String>,

    /// Fallback secret hashed into a key outside production.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Execution mode; `production` disables key derivation.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_app_env() -> String {
    "development".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Execution mode selected by `APP_ENV`.
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_app_env(&self.app_env)
    }

    /// Build the [`KeyProvider`] for these settings.
    pub fn key_provider(&self) -> KeyProvider {
        KeyProvider::new(
            self.store_encryption_key.clone(),
            self.app_secret.clone(),
            self.execution_mode(),
        )
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// Production without a key is not rejected here; that is the key
    /// provider's decision, made when the codec is built.
    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        if let Some(key) = self.store_encryption_key.as_deref() {
            if !key.trim().is_empty() {
                parse_hex_key(key).context("STORE_ENCRYPTION_KEY is invalid")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "store_encryption_key",
                &self.store_encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[REDACTED]"))
            .field("app_env", &self.app_env)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeySource;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_environment(config::Environment::default().source(Some(map)))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_app_env(), "development");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn loads_from_environment_variables() {
        let cfg = load(&[
            ("STORE_ENCRYPTION_KEY", HEX_KEY),
            ("APP_ENV", "production"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(cfg.store_encryption_key.as_deref(), Some(HEX_KEY));
        assert_eq!(cfg.app_secret, None);
        assert_eq!(cfg.execution_mode(), ExecutionMode::Production);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.store_encryption_key, None);
        assert_eq!(cfg.app_env, "development");
        assert_eq!(cfg.execution_mode(), ExecutionMode::Development);
    }

    #[test]
    fn invalid_key_rejected_at_load() {
        let err = load(&[("STORE_ENCRYPTION_KEY", "abc123")]).unwrap_err();
        assert!(format!("{err:#}").contains("STORE_ENCRYPTION_KEY"));
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let cfg = Config {
            store_encryption_key: None,
            app_secret: None,
            app_env: default_app_env(),
            log_level: " ".into(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_blank_key_as_absent() {
        let cfg = Config {
            store_encryption_key: Some("".into()),
            app_secret: None,
            app_env: default_app_env(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn key_provider_uses_app_secret_outside_production() {
        let cfg = load(&[("APP_SECRET", "app-secret")]).unwrap();
        let provider = cfg.key_provider();
        assert!(!provider.has_explicit_key());
        assert!(provider.key().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = Config {
            store_encryption_key: Some(HEX_KEY.into()),
            app_secret: Some("app-secret".into()),
            app_env: "production".into(),
            log_level: default_log_level(),
        };
        let printed = format!("{cfg:?}");
        assert!(!printed.contains(HEX_KEY));
        assert!(!printed.contains("app-secret"));
        assert!(printed.contains("production"));
    }
}
