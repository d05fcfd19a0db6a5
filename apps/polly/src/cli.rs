//! Command line interface definition

use clap::{Parser, Subcommand};

/// polly - runtime paths, pid file and logs for the polly service
#[derive(Parser)]
#[command(name = "polly")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runtime paths, pid file and logs for the polly service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Installation prefix (overrides POLLY_HOME)
    #[arg(long, global = true, value_name = "DIR")]
    pub prefix: Option<String>,

    /// Tee output and logs into this file in the log dir (overrides POLLY_LOG_FILE)
    #[arg(long, global = true, value_name = "NAME")]
    pub log_file: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show build information
    Version,

    /// Resolve the standard directories, creating them if needed
    #[command(alias = "dirs")]
    Paths,

    /// Read or write the service pid file
    #[command(subcommand)]
    Pid(PidCommands),

    /// Create the standard directories with install(1)
    Setup {
        /// Keep the invoking user as owner instead of root
        #[arg(long)]
        no_chown: bool,
    },
}

/// Pid file commands
#[derive(Subcommand)]
pub enum PidCommands {
    /// Record a process id (defaults to this process)
    Write {
        /// Process id to record
        #[arg(long)]
        pid: Option<u32>,
    },

    /// Print the recorded process id
    Read,
}
