//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("environment variable is not valid unicode: {var}")]
    EnvVarNotUnicode { var: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { field, .. } if field == "POLLY_LOG_FILE" => {
                Some("Use a bare file name; log files always live in the polly log directory.")
            }
            Self::InvalidValue { .. } => Some("Fix the configuration value and retry the command."),
            Self::EnvVarNotUnicode { .. } => {
                Some("Export the environment variable using a UTF-8 value.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidValue { .. } => Some("config.invalid_value"),
            Self::EnvVarNotUnicode { .. } => Some("config.env_not_unicode"),
        }
    }
}
