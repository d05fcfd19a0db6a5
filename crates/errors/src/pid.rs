//! PID file error types

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::UserFacingError;
use thiserror::Error;

/// Failures reading or writing the service's PID file
///
/// `Read` and `Parse` are kept apart so callers can tell a missing file from
/// a corrupt one.
#[derive(Debug, Clone, Error)]
pub enum PidError {
    #[error("failed to read pid file {}: {message}", .path.display())]
    Read {
        path: PathBuf,
        kind: ErrorKind,
        message: String,
    },

    #[error("failed to write pid file {}: {message}", .path.display())]
    Write {
        path: PathBuf,
        kind: ErrorKind,
        message: String,
    },

    #[error("pid file {} does not contain a process id: {contents:?}", .path.display())]
    Parse {
        path: PathBuf,
        contents: String,
        message: String,
    },
}

impl PidError {
    pub fn read(err: &std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Read {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn write(err: &std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Write {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// True when the pid file simply does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Read {
                kind: ErrorKind::NotFound,
                ..
            }
        )
    }
}

impl UserFacingError for PidError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Read {
                kind: ErrorKind::NotFound,
                ..
            } => Some("The service does not appear to be running."),
            Self::Read { .. } | Self::Write { .. } => {
                Some("Ensure the run directory exists and is writable.")
            }
            Self::Parse { .. } => Some("Remove the stale pid file and restart the service."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Read {
                kind: ErrorKind::Interrupted | ErrorKind::WouldBlock,
                ..
            } | Self::Write {
                kind: ErrorKind::Interrupted | ErrorKind::WouldBlock,
                ..
            }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::Read {
                kind: ErrorKind::NotFound,
                ..
            } => Some("pid.not_found"),
            Self::Read { .. } => Some("pid.read_failed"),
            Self::Write { .. } => Some("pid.write_failed"),
            Self::Parse { .. } => Some("pid.corrupt"),
        }
    }
}
