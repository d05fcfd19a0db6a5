//! Wrappers around the OS `install` utility
//!
//! Every call reports failure through its return value. Callers that only
//! want a best-effort install (the historical behaviour) drop the result
//! explicitly.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus};

use polly_errors::PlatformError;
use tracing::{debug, warn};

/// Program run by [`Installer`] unless told otherwise
pub const INSTALL_PROGRAM: &str = "install";

/// Owner and group flags that make the target root-owned
const CHOWN_ROOT_ARGS: [&str; 4] = ["-o", "0", "-g", "0"];

/// Builder for a single `install` invocation
#[derive(Debug, Clone)]
pub struct InstallCommand {
    program: String,
    args: Vec<String>,
}

impl InstallCommand {
    /// Create a new command for `program`
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Render as a shell-like string for logs and errors
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::CommandNotFound` if the program is missing and
    /// `PlatformError::ProcessExecutionFailed` if it cannot be spawned or
    /// exits unsuccessfully.
    pub fn run(&self) -> Result<ExitStatus, PlatformError> {
        let command = self.display();
        debug!(command = %command, "running install command");

        let output = Command::new(&self.program)
            .args(self.args.iter().map(OsStr::new))
            .output()
            .map_err(|e| PlatformError::from_spawn(&self.program, &e))?;

        if output.status.success() {
            return Ok(output.status);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command = %command, status = %output.status, stderr = %stderr, "install command failed");
        Err(PlatformError::ProcessExecutionFailed {
            command,
            message: if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            },
        })
    }
}

/// Issues `install` commands
#[derive(Debug, Clone)]
pub struct Installer {
    program: String,
}

impl Installer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(INSTALL_PROGRAM)
    }

    /// Use a different binary in place of `install`
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// `install <args>`
    #[must_use]
    pub fn command<I, S>(&self, args: I) -> InstallCommand
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = InstallCommand::new(&self.program);
        cmd.args(args);
        cmd
    }

    /// `install -o 0 -g 0 <args>`
    #[must_use]
    pub fn chown_root_command<I, S>(&self, args: I) -> InstallCommand
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = InstallCommand::new(&self.program);
        cmd.args(CHOWN_ROOT_ARGS).args(args);
        cmd
    }

    /// Run the system install command
    ///
    /// # Errors
    ///
    /// See [`InstallCommand::run`].
    pub fn install<I, S>(&self, args: I) -> Result<ExitStatus, PlatformError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command(args).run()
    }

    /// Run the system install command, making root the owner and group of the
    /// target
    ///
    /// # Errors
    ///
    /// See [`InstallCommand::run`].
    pub fn install_chown_root<I, S>(&self, args: I) -> Result<ExitStatus, PlatformError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.chown_root_command(args).run()
    }

    /// Create a root-owned directory, `install -o 0 -g 0 -d <dir>`
    ///
    /// # Errors
    ///
    /// See [`InstallCommand::run`].
    pub fn install_dir_chown_root(&self, dir: &Path) -> Result<ExitStatus, PlatformError> {
        let dir = dir.to_string_lossy();
        self.install_chown_root(["-d", &*dir])
    }
}

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}
