//! Version banner

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::DateTime;
use serde::Serialize;

/// Metadata about the running build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Absolute path of the running executable
    pub binary: PathBuf,
    pub semver: String,
    pub os_arch: String,
    pub branch: String,
    pub commit: String,
    /// Build time, seconds since the Unix epoch
    pub epoch: i64,
}

impl BuildInfo {
    /// Metadata for this binary, with git details baked in at build time
    #[must_use]
    pub fn current() -> Self {
        Self {
            binary: std::env::current_exe().unwrap_or_default(),
            semver: env!("CARGO_PKG_VERSION").to_string(),
            os_arch: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            branch: env!("POLLY_GIT_BRANCH").to_string(),
            commit: env!("POLLY_GIT_COMMIT").to_string(),
            epoch: env!("POLLY_BUILD_EPOCH").parse().unwrap_or(0),
        }
    }

    /// Build time in RFC 1123 form, e.g. `Mon, 02 Jan 2006 15:04:05 UTC`
    #[must_use]
    pub fn formed(&self) -> String {
        DateTime::from_timestamp(self.epoch, 0)
            .unwrap_or_default()
            .format("%a, %d %b %Y %H:%M:%S UTC")
            .to_string()
    }
}

/// Write the six-line version banner to `out`
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn print_version<W: Write + ?Sized>(out: &mut W, info: &BuildInfo) -> io::Result<()> {
    writeln!(out, "Binary: {}", info.binary.display())?;
    writeln!(out, "SemVer: {}", info.semver)?;
    writeln!(out, "OsArch: {}", info.os_arch)?;
    writeln!(out, "Branch: {}", info.branch)?;
    writeln!(out, "Commit: {}", info.commit)?;
    writeln!(out, "Formed: {}", info.formed())
}
