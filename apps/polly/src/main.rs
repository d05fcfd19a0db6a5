//! polly - runtime support CLI for the polly service
//!
//! Resolves the service's directories under the configured prefix, manages
//! its pid file and log files, and prints build information.

mod cli;
mod display;
mod error;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs, PidCommands};
use crate::display::{OutputRenderer, PathsReport, SetupEntry};
use crate::error::CliError;
use crate::logging::init_tracing;
use clap::Parser;
use polly_config::{validate_log_file_name, Config, DirKind, PathResolver};
use polly_platform::{BuildInfo, Installer, LogFiles, PidFile};
use std::io::{self, Write};
use std::process;
use tracing::{debug, error, info, warn};

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli) {
        error!("Application error: {}", e);
        if json_mode {
            let body = serde_json::json!({ "error": e.to_string() });
            eprintln!("{body}");
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
fn run(cli: Cli) -> Result<(), CliError> {
    // 1. Defaults merged with the environment
    let mut config = Config::from_env()?;

    // 2. CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global)?;

    let resolver = config.resolver();
    let mut out = open_output(&config, &resolver, cli.global.debug)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        prefix = %resolver.prefix(),
        "starting polly"
    );

    let renderer = OutputRenderer::new(cli.global.json);
    execute_command(cli.command, &resolver, renderer, &mut out)?;
    out.flush()?;

    debug!("command completed");
    Ok(())
}

fn apply_cli_config(config: &mut Config, global: &GlobalArgs) -> Result<(), CliError> {
    if let Some(prefix) = &global.prefix {
        config.prefix.set(prefix);
    }
    if let Some(name) = &global.log_file {
        config.log_file = Some(validate_log_file_name("--log-file", name)?);
    }
    Ok(())
}

/// Set up tracing and pick the sink for command output
///
/// With a log file configured, output goes to stdout and the log file. The
/// log dir is resolved before tracing exists, so its warning is replayed.
fn open_output(
    config: &Config,
    resolver: &PathResolver,
    debug_enabled: bool,
) -> Result<Box<dyn Write>, CliError> {
    let Some(name) = &config.log_file else {
        init_tracing(debug_enabled, None);
        return Ok(Box::new(io::stdout()));
    };

    let logs = LogFiles::new(resolver);
    init_tracing(debug_enabled, Some(logs.log_file(name)?));

    let log_dir = resolver.resolve(DirKind::Log);
    if let Some(warning) = &log_dir.warning {
        warn!(path = %log_dir.path.display(), error = %warning, "missing access to log dir");
    }

    Ok(Box::new(logs.stdout_and_log_file(name)?))
}

fn execute_command(
    command: Commands,
    resolver: &PathResolver,
    renderer: OutputRenderer,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Commands::Version => renderer.render_version(out, &BuildInfo::current()),

        Commands::Paths => renderer.render_paths(out, &PathsReport::collect(resolver)),

        Commands::Pid(PidCommands::Write { pid }) => {
            let pid_file = PidFile::new(resolver);
            let written = pid_file.write(pid)?;
            info!(pid = written, path = %pid_file.path().display(), "recorded pid");
            renderer.render_pid(out, written, &pid_file.path())
        }

        Commands::Pid(PidCommands::Read) => {
            let pid_file = PidFile::new(resolver);
            let pid = pid_file.read()?;
            renderer.render_pid(out, pid, &pid_file.path())
        }

        Commands::Setup { no_chown } => {
            let entries = setup_dirs(resolver, no_chown);
            renderer.render_setup(out, &entries)
        }
    }
}

/// Create every standard directory with install(1)
///
/// Failures are collected and logged, never fatal: a partially set up
/// layout is still usable by whatever can run in it.
fn setup_dirs(resolver: &PathResolver, no_chown: bool) -> Vec<SetupEntry> {
    let installer = Installer::new();

    DirKind::ALL
        .iter()
        .map(|kind| {
            let path = resolver.resolve(*kind).path;
            let result = if no_chown {
                installer.install(["-d", "-m", "0755", &*path.to_string_lossy()])
            } else {
                installer.install_dir_chown_root(&path)
            };
            let error = match result {
                Ok(_) => None,
                Err(e) => {
                    warn!(kind = kind.as_str(), path = %path.display(), error = %e, "install failed");
                    Some(e.to_string())
                }
            };
            SetupEntry { path, error }
        })
        .collect()
}
