//! Fixed names and filesystem paths for polly
//!
//! Directory suffixes are appended to the installation prefix. The unit file,
//! init script and env file name are absolute and never prefixed.

pub const SERVICE_NAME: &str = "polly";

/// Environment variable holding the installation prefix
pub const PREFIX_ENV_VAR: &str = "POLLY_HOME";

/// Environment variable naming a log file to tee output into
pub const LOG_FILE_ENV_VAR: &str = "POLLY_LOG_FILE";

pub const UNIT_FILE_PATH: &str = "/etc/systemd/system/polly.service";
pub const INIT_FILE_PATH: &str = "/etc/init.d/polly";
pub const ENV_FILE_NAME: &str = "polly.env";

pub const BIN_DIR_SUFFIX: &str = "/usr/bin";

/// Mode every resolved directory is created with
pub const DIR_MODE: u32 = 0o755;
