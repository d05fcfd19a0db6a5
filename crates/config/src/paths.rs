//! Lazily resolved service directories and files
//!
//! Every directory is computed by appending a fixed suffix to the prefix.
//! The first lookup of a directory creates it (mode 0755) and checks that it
//! can be used; later lookups return the cached result without touching the
//! filesystem again. Changing the prefix throws every cached value away.
//!
//! Creation and access failures are soft: they are logged and attached to the
//! [`ResolvedPath`] as an [`AccessWarning`], and the path is returned anyway.
//! Code that needs write access finds out for sure when it writes.

use std::ffi::OsString;
use std::fmt;
use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use polly_errors::ConfigError;
use serde::Serialize;
use tracing::{debug, warn};

use crate::access;
use crate::constants::{BIN_DIR_SUFFIX, DIR_MODE, SERVICE_NAME};
use crate::prefix::Prefix;

/// The standard directories a polly installation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirKind {
    Etc,
    Run,
    Log,
    Lib,
    Bin,
}

impl DirKind {
    pub const ALL: [DirKind; 5] = [Self::Etc, Self::Run, Self::Log, Self::Lib, Self::Bin];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Etc => "etc",
            Self::Run => "run",
            Self::Log => "log",
            Self::Lib => "lib",
            Self::Bin => "bin",
        }
    }

    /// Path appended to the prefix for this directory
    #[must_use]
    pub fn suffix(self, service: &str) -> String {
        match self {
            Self::Etc => format!("/etc/{service}"),
            Self::Run => format!("/var/run/{service}"),
            Self::Log => format!("/var/log/{service}"),
            Self::Lib => format!("/var/lib/{service}"),
            Self::Bin => BIN_DIR_SUFFIX.to_string(),
        }
    }

    /// The service writes into run and log at runtime
    #[must_use]
    pub fn requires_write(self) -> bool {
        matches!(self, Self::Run | Self::Log)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DirKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One thing that went wrong while preparing a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum AccessProblem {
    CreateFailed { message: String },
    NotReadable { message: String },
    NotWritable { message: String },
}

impl fmt::Display for AccessProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed { message } => write!(f, "create failed: {message}"),
            Self::NotReadable { message } => write!(f, "not readable: {message}"),
            Self::NotWritable { message } => write!(f, "not writable: {message}"),
        }
    }
}

/// Soft failure recorded while resolving a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessWarning {
    pub problems: Vec<AccessProblem>,
}

impl fmt::Display for AccessWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}

/// A resolved directory and whatever went wrong preparing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub kind: DirKind,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<AccessWarning>,
}

impl ResolvedPath {
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.warning.is_none()
    }
}

/// Memoized values for one prefix generation
#[derive(Debug, Default)]
struct Slots {
    dirs: [Option<ResolvedPath>; 5],
    pid_file: Option<PathBuf>,
    bin_file: Option<PathBuf>,
}

#[derive(Debug)]
struct State {
    prefix: Prefix,
    slots: Slots,
}

/// Resolves and caches the standard polly directories under a prefix
///
/// The prefix and every cache slot sit behind one mutex, so a prefix change
/// and the invalidation it causes are a single step, and a directory is
/// created at most once per prefix no matter how many threads ask for it.
/// Configure the prefix before handing the resolver to workers if they must
/// all agree on the same layout.
#[derive(Debug)]
pub struct PathResolver {
    service: String,
    state: Mutex<State>,
}

impl PathResolver {
    #[must_use]
    pub fn new(prefix: Prefix) -> Self {
        Self::with_service(SERVICE_NAME, prefix)
    }

    /// Resolver for a service name other than `polly`
    #[must_use]
    pub fn with_service(service: impl Into<String>, prefix: Prefix) -> Self {
        Self {
            service: service.into(),
            state: Mutex::new(State {
                prefix,
                slots: Slots::default(),
            }),
        }
    }

    /// Resolver seeded from `POLLY_HOME`
    ///
    /// # Errors
    ///
    /// See [`Prefix::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(Prefix::from_env()?))
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn prefix(&self) -> Prefix {
        self.lock().prefix.clone()
    }

    #[must_use]
    pub fn is_prefixed(&self) -> bool {
        self.lock().prefix.is_set()
    }

    /// Change the prefix and drop every cached path
    ///
    /// Empty and root prefixes are ignored; returns whether the prefix was
    /// accepted.
    pub fn set_prefix(&self, raw: &str) -> bool {
        let mut state = self.lock();
        if !state.prefix.set(raw) {
            debug!(prefix = raw, "ignoring empty or root prefix");
            return false;
        }
        state.slots = Slots::default();
        debug!(prefix = %state.prefix, "prefix changed, path cache cleared");
        true
    }

    /// Resolve a directory, creating and checking it on first use
    #[must_use]
    pub fn resolve(&self, kind: DirKind) -> ResolvedPath {
        let mut state = self.lock();
        self.resolve_locked(&mut state, kind)
    }

    /// Resolve every standard directory in a fixed order
    #[must_use]
    pub fn layout(&self) -> Vec<ResolvedPath> {
        let mut state = self.lock();
        DirKind::ALL
            .iter()
            .map(|kind| self.resolve_locked(&mut state, *kind))
            .collect()
    }

    #[must_use]
    pub fn etc_dir_path(&self) -> PathBuf {
        self.resolve(DirKind::Etc).path
    }

    #[must_use]
    pub fn run_dir_path(&self) -> PathBuf {
        self.resolve(DirKind::Run).path
    }

    #[must_use]
    pub fn log_dir_path(&self) -> PathBuf {
        self.resolve(DirKind::Log).path
    }

    #[must_use]
    pub fn lib_dir_path(&self) -> PathBuf {
        self.resolve(DirKind::Lib).path
    }

    #[must_use]
    pub fn bin_dir_path(&self) -> PathBuf {
        self.resolve(DirKind::Bin).path
    }

    /// `<run>/<service>.pid`
    #[must_use]
    pub fn pid_file_path(&self) -> PathBuf {
        let mut state = self.lock();
        if let Some(path) = &state.slots.pid_file {
            return path.clone();
        }
        let run = self.resolve_locked(&mut state, DirKind::Run).path;
        let path = child(&run, &format!("{}.pid", self.service));
        state.slots.pid_file = Some(path.clone());
        path
    }

    /// `<bin>/<service>`
    #[must_use]
    pub fn bin_file_path(&self) -> PathBuf {
        let mut state = self.lock();
        if let Some(path) = &state.slots.bin_file {
            return path.clone();
        }
        let bin = self.resolve_locked(&mut state, DirKind::Bin).path;
        let path = child(&bin, &self.service);
        state.slots.bin_file = Some(path.clone());
        path
    }

    #[must_use]
    pub fn etc_file_path(&self, name: &str) -> PathBuf {
        child(&self.etc_dir_path(), name)
    }

    #[must_use]
    pub fn log_file_path(&self, name: &str) -> PathBuf {
        child(&self.log_dir_path(), name)
    }

    #[must_use]
    pub fn lib_file_path(&self, name: &str) -> PathBuf {
        child(&self.lib_dir_path(), name)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve_locked(&self, state: &mut State, kind: DirKind) -> ResolvedPath {
        if let Some(resolved) = &state.slots.dirs[kind.slot()] {
            return resolved.clone();
        }

        let path = PathBuf::from(format!("{}{}", state.prefix, kind.suffix(&self.service)));
        let warning = prepare_dir(&path, kind);
        match &warning {
            Some(warning) => warn!(
                kind = kind.as_str(),
                path = %path.display(),
                error = %warning,
                "missing access to {kind} dir"
            ),
            None => debug!(kind = kind.as_str(), path = %path.display(), "resolved dir"),
        }

        let resolved = ResolvedPath {
            kind,
            path,
            warning,
        };
        state.slots.dirs[kind.slot()] = Some(resolved.clone());
        resolved
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(Prefix::default())
    }
}

/// `dir + "/" + name`, without `Path::join` replacing `dir` for absolute names
fn child(dir: &Path, name: &str) -> PathBuf {
    let mut joined = OsString::from(dir.as_os_str());
    joined.push("/");
    joined.push(name);
    PathBuf::from(joined)
}

fn prepare_dir(path: &Path, kind: DirKind) -> Option<AccessWarning> {
    let mut problems = Vec::new();

    if let Err(e) = DirBuilder::new().recursive(true).mode(DIR_MODE).create(path) {
        problems.push(AccessProblem::CreateFailed {
            message: e.to_string(),
        });
    }
    if let Err(e) = access::readable(path) {
        problems.push(AccessProblem::NotReadable {
            message: e.to_string(),
        });
    }
    if kind.requires_write() {
        if let Err(e) = access::writable(path) {
            problems.push(AccessProblem::NotWritable {
                message: e.to_string(),
            });
        }
    }

    if problems.is_empty() {
        None
    } else {
        Some(AccessWarning { problems })
    }
}
