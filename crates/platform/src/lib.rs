#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Process-level services built on the polly path layout.
//!
//! This crate provides:
//! - PID file write/read against the resolved run directory
//! - Append-mode log files, optionally teed with stdout
//! - Wrappers around the OS `install` utility
//! - The version banner

pub mod logfile;
pub mod pid;
pub mod process;
pub mod version;

pub use logfile::{LogFiles, TeeWriter};
pub use pid::PidFile;
pub use process::{InstallCommand, Installer};
pub use version::{print_version, BuildInfo};
