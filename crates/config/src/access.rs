//! Readability and writability checks for resolved directories

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

fn access(path: &Path, mode: libc::c_int) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is NUL-terminated and outlives the call.
    #[allow(unsafe_code)]
    let rc = unsafe { libc::access(c_path.as_ptr(), mode) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Check that the current process may read `path`
///
/// # Errors
///
/// Returns the OS error reported by `access(2)`.
pub fn readable(path: &Path) -> io::Result<()> {
    access(path, libc::R_OK)
}

/// Check that the current process may write `path`
///
/// # Errors
///
/// Returns the OS error reported by `access(2)`.
pub fn writable(path: &Path) -> io::Result<()> {
    access(path, libc::W_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_dir_is_readable_and_writable() {
        let temp = tempfile::tempdir().unwrap();
        assert!(readable(temp.path()).is_ok());
        assert!(writable(temp.path()).is_ok());
    }

    #[test]
    fn missing_path_reports_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let err = readable(&temp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn interior_nul_is_invalid_input() {
        let err = readable(Path::new("bad\0path")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
