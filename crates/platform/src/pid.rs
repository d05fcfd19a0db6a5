//! Service PID file
//!
//! The file holds the decimal process id and nothing else. There is no
//! locking: two writers race and the last one wins, which is fine while a
//! single service instance owns the file. Removing the file is left to the
//! caller.

use std::path::PathBuf;

use polly_config::PathResolver;
use polly_errors::PidError;
use tracing::debug;

/// Reads and writes `<run>/<service>.pid`
#[derive(Debug, Clone, Copy)]
pub struct PidFile<'a> {
    resolver: &'a PathResolver,
}

impl<'a> PidFile<'a> {
    #[must_use]
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.resolver.pid_file_path()
    }

    /// Record a process id, overwriting any previous content
    ///
    /// `None` records the current process. Returns the id that was written.
    ///
    /// # Errors
    ///
    /// Returns `PidError::Write` if the file cannot be written.
    pub fn write(&self, pid: Option<u32>) -> Result<u32, PidError> {
        let pid = pid.unwrap_or_else(std::process::id);
        let path = self.path();
        std::fs::write(&path, pid.to_string()).map_err(|e| PidError::write(&e, &path))?;
        debug!(pid, path = %path.display(), "wrote pid file");
        Ok(pid)
    }

    /// Read the recorded process id
    ///
    /// Surrounding whitespace is ignored so a hand-edited file with a
    /// trailing newline still parses. Process ids are never negative, so a
    /// leading `-` is treated as corruption.
    ///
    /// # Errors
    ///
    /// Returns `PidError::Read` if the file cannot be read (a missing file
    /// carries `ErrorKind::NotFound`) and `PidError::Parse` if it does not
    /// hold a base-10 integer.
    pub fn read(&self) -> Result<u32, PidError> {
        let path = self.path();
        let contents = std::fs::read_to_string(&path).map_err(|e| PidError::read(&e, &path))?;
        contents
            .trim()
            .parse::<u32>()
            .map_err(|e| PidError::Parse {
                path,
                contents: contents.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polly_config::Prefix;

    #[test]
    fn shorter_pid_overwrites_longer() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(Prefix::new(temp.path().to_str().unwrap()));
        let pid_file = PidFile::new(&resolver);

        pid_file.write(Some(987_654)).unwrap();
        pid_file.write(Some(7)).unwrap();

        assert_eq!(std::fs::read_to_string(pid_file.path()).unwrap(), "7");
        assert_eq!(pid_file.read().unwrap(), 7);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(Prefix::new(temp.path().to_str().unwrap()));
        let pid_file = PidFile::new(&resolver);

        std::fs::write(pid_file.path(), "4321\n").unwrap();
        assert_eq!(pid_file.read().unwrap(), 4321);
    }

    #[test]
    fn negative_pid_is_a_parse_error() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(Prefix::new(temp.path().to_str().unwrap()));
        let pid_file = PidFile::new(&resolver);

        std::fs::write(pid_file.path(), "-5").unwrap();
        match pid_file.read().unwrap_err() {
            PidError::Parse { contents, .. } => assert_eq!(contents, "-5"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
