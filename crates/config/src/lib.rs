#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Path layout and configuration for polly
//!
//! Configuration is deliberately thin. It comes from:
//! - Default values (system locations, no prefix)
//! - Environment variables (`POLLY_HOME`, `POLLY_LOG_FILE`)
//! - CLI flags, applied by the binary on top of the above
//!
//! There is no configuration file. Everything else is derived from the
//! prefix by [`PathResolver`].

pub mod access;
pub mod constants;
pub mod paths;
pub mod prefix;

pub use constants as fixed_paths;
pub use paths::{AccessProblem, AccessWarning, DirKind, PathResolver, ResolvedPath};
pub use prefix::Prefix;

use std::env::VarError;

use polly_errors::{ConfigError, Error};

use crate::constants::LOG_FILE_ENV_VAR;

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Installation prefix, empty for system locations
    pub prefix: Prefix,

    /// Log file inside the log dir that output is teed into
    pub log_file: Option<String>,
}

impl Config {
    /// Defaults merged with the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge with environment variables
    ///
    /// An empty or root `POLLY_HOME` leaves the current prefix alone.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables are not unicode or contain
    /// values that cannot be used.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // POLLY_HOME
        let prefix = Prefix::from_env()?;
        if prefix.is_set() {
            self.prefix = prefix;
        }

        // POLLY_LOG_FILE
        if let Some(name) = read_var(LOG_FILE_ENV_VAR)? {
            self.log_file = Some(validate_log_file_name(LOG_FILE_ENV_VAR, &name)?);
        }

        Ok(())
    }

    /// Path resolver for the configured prefix
    #[must_use]
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.prefix.clone())
    }
}

/// Check that `name` is a bare file name usable inside the log dir
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for empty names, `.`/`..`, or names
/// containing a path separator.
pub fn validate_log_file_name(field: &str, name: &str) -> Result<String, ConfigError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: name.to_string(),
        });
    }
    Ok(name.to_string())
}

pub(crate) fn read_var(var: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::EnvVarNotUnicode {
            var: var.to_string(),
        }),
    }
}
