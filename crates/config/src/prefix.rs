//! Installation prefix handling

use std::fmt;

use polly_errors::ConfigError;
use serde::Serialize;

use crate::constants::PREFIX_ENV_VAR;
use crate::read_var;

/// Root path every polly directory is resolved under
///
/// An empty prefix means "use the system locations". The empty string and
/// `/` are treated the same and can never be set over an existing prefix.
/// Trailing slashes are dropped so `/opt/polly/` and `/opt/polly` resolve to
/// the same directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    /// Build a prefix from raw input, normalizing root to "no prefix"
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw).unwrap_or_default())
    }

    /// Read the prefix from `POLLY_HOME`, empty when unset
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvVarNotUnicode` if the variable is set but not
    /// valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(read_var(PREFIX_ENV_VAR)?
            .map(|raw| Self::new(&raw))
            .unwrap_or_default())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a non-root prefix is in effect
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    /// Replace the prefix
    ///
    /// Returns `false` and leaves the current value alone when `raw` is empty
    /// or the filesystem root.
    pub fn set(&mut self, raw: &str) -> bool {
        match normalize(raw) {
            Some(prefix) => {
                self.0 = prefix;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
