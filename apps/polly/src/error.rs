//! CLI error handling

use std::fmt;

use polly_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(polly_errors::ConfigError),
    /// Runtime error from the library crates
    Runtime(polly_errors::Error),
    /// Result could not be rendered
    Render(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Runtime(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Render(msg) => write!(f, "Failed to render output: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Render(_) => None,
        }
    }
}

impl From<polly_errors::ConfigError> for CliError {
    fn from(e: polly_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<polly_errors::Error> for CliError {
    fn from(e: polly_errors::Error) -> Self {
        match e {
            polly_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Runtime(other),
        }
    }
}

impl From<polly_errors::PidError> for CliError {
    fn from(e: polly_errors::PidError) -> Self {
        CliError::Runtime(e.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Render(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
