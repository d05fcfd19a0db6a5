//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur while running external OS commands
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },
}

impl PlatformError {
    /// Map a spawn failure onto the matching variant
    pub fn from_spawn(command: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::CommandNotFound {
                command: command.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: format!("spawn {command}"),
                message: err.to_string(),
            },
            _ => Self::ProcessExecutionFailed {
                command: command.to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => Some("Install coreutils or add it to PATH."),
            Self::PermissionDenied { .. } => Some("Re-run the command as root."),
            Self::ProcessExecutionFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::ProcessExecutionFailed { .. } => Some("platform.process_failed"),
            Self::CommandNotFound { .. } => Some("platform.command_not_found"),
            Self::PermissionDenied { .. } => Some("platform.permission_denied"),
        }
    }
}
