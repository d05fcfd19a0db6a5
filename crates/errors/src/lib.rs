#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the polly runtime support crates
//!
//! Errors are grouped by domain. Soft failures (directory creation, access
//! checks) never surface here; they are reported as warnings by the path
//! resolver. Everything in this crate is a hard failure the caller must see.

use std::borrow::Cow;
use std::path::PathBuf;

use thiserror::Error;

pub mod config;
pub mod pid;
pub mod platform;

pub use config::ConfigError;
pub use pid::PidError;
pub use platform::PlatformError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("pid file error: {0}")]
    Pid(#[from] PidError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<PathBuf>,
    },
}

impl Error {
    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Result type alias for polly operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Config(err) => err.user_message(),
            Error::Pid(err) => err.user_message(),
            Error::Platform(err) => err.user_message(),
            Error::Io {
                message,
                path: Some(path),
                ..
            } => Cow::Owned(format!("{message} ({})", path.display())),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_hint(),
            Error::Pid(err) => err.user_hint(),
            Error::Platform(err) => err.user_hint(),
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            } => Some("Check the permissions of the polly directories or set POLLY_HOME."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Pid(err) => err.is_retryable(),
            Error::Platform(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_code(),
            Error::Pid(err) => err.user_code(),
            Error::Platform(err) => err.user_code(),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
