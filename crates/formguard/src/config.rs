//! Validator configuration.
//!
//! Defaults need no setup. With the `env` feature the same settings can be
//! read from `FORMGUARD_*` environment variables, optionally seeded from a
//! `.env` file.
//!
//! ```ignore
//! use formguard::config::{load_dotenv, ValidatorConfig};
//!
//! load_dotenv();
//! let config = ValidatorConfig::from_env().expect("Failed to load config");
//! ```

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// What counts as an empty value.
///
/// Empty values skip length, range and type checks, fail `required()`, and
/// are replaced by the default in `validate()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Only an absent value or zero-length text is empty.
    #[default]
    Strict,
    /// Additionally treats `"0"`, integer `0` and float `0.0` as empty,
    /// matching older form handlers that used falsy checks.
    Legacy,
}

/// Settings shared by every session of a [`ValueValidator`](crate::ValueValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Emptiness rule
    pub empty_policy: EmptyPolicy,
    /// Zone used by `as_date()` when none is given
    pub timezone: Tz,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            empty_policy: EmptyPolicy::Strict,
            timezone: Tz::Asia__Dhaka,
        }
    }
}

impl ValidatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the emptiness rule.
    pub fn empty_policy(mut self, policy: EmptyPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Set the default time zone for date coercion.
    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }
}

#[cfg(feature = "env")]
pub use self::env::{load_dotenv, ConfigError, ENV_PREFIX};

#[cfg(feature = "env")]
mod env {
    use super::ValidatorConfig;
    use thiserror::Error;

    /// Prefix of the environment variables read by [`ValidatorConfig::from_env`].
    pub const ENV_PREFIX: &str = "FORMGUARD_";

    /// Error type for configuration loading failures.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Environment variable deserialization failed.
        #[error("Configuration error: {0}")]
        Envy(#[from] envy::Error),
    }

    /// Load a `.env` file from the current directory or its parents.
    ///
    /// A missing file is not an error.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env file"),
        }
    }

    impl ValidatorConfig {
        /// Read `FORMGUARD_EMPTY_POLICY` (`strict` | `legacy`) and
        /// `FORMGUARD_TIMEZONE` (IANA name). Unset variables keep defaults.
        pub fn from_env() -> Result<Self, ConfigError> {
            Ok(envy::prefixed(ENV_PREFIX).from_env::<ValidatorConfig>()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.empty_policy, EmptyPolicy::Strict);
        assert_eq!(config.timezone, Tz::Asia__Dhaka);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"empty_policy":"legacy"}"#).unwrap();
        assert_eq!(config.empty_policy, EmptyPolicy::Legacy);
        assert_eq!(config.timezone, Tz::Asia__Dhaka);

        let config: ValidatorConfig =
            serde_json::from_str(r#"{"timezone":"Europe/Berlin"}"#).unwrap();
        assert_eq!(config.timezone, Tz::Europe__Berlin);
    }

    #[test]
    fn builder_methods() {
        let config = ValidatorConfig::new()
            .empty_policy(EmptyPolicy::Legacy)
            .timezone(Tz::UTC);
        assert_eq!(config.empty_policy, EmptyPolicy::Legacy);
        assert_eq!(config.timezone, Tz::UTC);
    }

    #[cfg(feature = "env")]
    mod env {
        use super::*;
        use serial_test::serial;

        #[test]
        #[serial]
        fn from_env_reads_prefixed_vars() {
            std::env::set_var("FORMGUARD_EMPTY_POLICY", "legacy");
            std::env::set_var("FORMGUARD_TIMEZONE", "UTC");
            let config = ValidatorConfig::from_env().unwrap();
            std::env::remove_var("FORMGUARD_EMPTY_POLICY");
            std::env::remove_var("FORMGUARD_TIMEZONE");

            assert_eq!(config.empty_policy, EmptyPolicy::Legacy);
            assert_eq!(config.timezone, Tz::UTC);
        }

        #[test]
        #[serial]
        fn from_env_rejects_unknown_policy() {
            std::env::set_var("FORMGUARD_EMPTY_POLICY", "sometimes");
            let result = ValidatorConfig::from_env();
            std::env::remove_var("FORMGUARD_EMPTY_POLICY");

            assert!(result.is_err());
        }
    }
}
