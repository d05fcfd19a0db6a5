//! Log files in the resolved log directory
//!
//! Files are opened for append and created with mode 0644 when missing.
//! There is no rotation or size cap.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::os::unix::fs::OpenOptionsExt;

use polly_config::PathResolver;
use polly_errors::Error;
use tracing::debug;

const LOG_FILE_MODE: u32 = 0o644;

/// Opens named log files under `<log>/`
#[derive(Debug, Clone, Copy)]
pub struct LogFiles<'a> {
    resolver: &'a PathResolver,
}

impl<'a> LogFiles<'a> {
    #[must_use]
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    /// Open `<log>/<name>` for append, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns an I/O error carrying the path if the file cannot be opened.
    pub fn log_file(&self, name: &str) -> Result<File, Error> {
        let path = self.resolver.log_file_path(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .mode(LOG_FILE_MODE)
            .open(&path)
            .map_err(|e| Error::io_with_path(&e, &path))?;
        debug!(path = %path.display(), "opened log file");
        Ok(file)
    }

    /// A writer that copies everything to stdout and `<log>/<name>`
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be opened; there is no stdout-only
    /// fallback.
    pub fn stdout_and_log_file(&self, name: &str) -> Result<TeeWriter<Stdout, File>, Error> {
        self.tee_log_file(name, io::stdout())
    }

    /// A writer that copies everything to `out` and `<log>/<name>`
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be opened.
    pub fn tee_log_file<W: Write>(
        &self,
        name: &str,
        out: W,
    ) -> Result<TeeWriter<W, File>, Error> {
        let file = self.log_file(name)?;
        Ok(TeeWriter::new(out, file))
    }
}

/// Writes every buffer in full to two sinks, first `primary` then `secondary`
///
/// A failure on either sink fails the write.
#[derive(Debug)]
pub struct TeeWriter<A, B> {
    primary: A,
    secondary: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    #[must_use]
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }

    #[must_use]
    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.secondary.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken sink"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tee_writes_both_sinks() {
        let mut tee = TeeWriter::new(Vec::new(), Vec::new());
        tee.write_all(b"hello").unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a, b"hello");
        assert_eq!(b, b"hello");
    }

    #[test]
    fn tee_fails_if_either_sink_fails() {
        let mut tee = TeeWriter::new(Vec::new(), Broken);
        assert!(tee.write_all(b"hello").is_err());
    }
}
