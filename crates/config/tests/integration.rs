//! Integration tests for config

#[cfg(test)]
mod tests {
    use polly_config::*;
    use proptest::prelude::*;
    use std::path::Path;
    use std::sync::{Arc, Barrier, Mutex};
    use tempfile::tempdir;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn prefix_of(path: &Path) -> Prefix {
        Prefix::new(path.to_str().unwrap())
    }

    #[test]
    fn test_resolved_dirs_start_with_prefix() {
        let temp = tempdir().unwrap();
        let resolver = PathResolver::new(prefix_of(temp.path()));

        for resolved in resolver.layout() {
            assert!(resolved.path.starts_with(temp.path()), "{resolved:?}");
            assert!(resolved.path.is_dir());
            assert!(resolved.is_usable(), "{resolved:?}");
        }
        assert!(resolver.pid_file_path().starts_with(temp.path()));
        assert!(resolver.bin_file_path().starts_with(temp.path()));
    }

    #[test]
    fn test_root_and_empty_never_replace_prefix() {
        let temp = tempdir().unwrap();
        let resolver = PathResolver::new(prefix_of(temp.path()));
        let before = resolver.etc_dir_path();

        assert!(!resolver.set_prefix(""));
        assert!(!resolver.set_prefix("/"));

        assert!(resolver.is_prefixed());
        assert_eq!(resolver.prefix().as_str(), temp.path().to_str().unwrap());
        assert_eq!(resolver.etc_dir_path(), before);
    }

    #[test]
    fn test_resolution_is_memoized() {
        let temp = tempdir().unwrap();
        let resolver = PathResolver::new(prefix_of(temp.path()));

        let first = resolver.run_dir_path();
        assert!(first.is_dir());

        // A second lookup must not recreate the directory.
        std::fs::remove_dir(&first).unwrap();
        let second = resolver.run_dir_path();
        assert_eq!(first, second);
        assert!(!second.exists());
    }

    #[test]
    fn test_set_prefix_invalidates_every_slot() {
        let old = tempdir().unwrap();
        let new = tempdir().unwrap();
        let resolver = PathResolver::new(prefix_of(old.path()));

        let old_pid = resolver.pid_file_path();
        let old_bin = resolver.bin_file_path();
        let old_layout = resolver.layout();
        assert!(old_pid.starts_with(old.path()));

        assert!(resolver.set_prefix(new.path().to_str().unwrap()));

        assert!(resolver.pid_file_path().starts_with(new.path()));
        assert!(resolver.bin_file_path().starts_with(new.path()));
        assert_ne!(resolver.bin_file_path(), old_bin);
        for (resolved, stale) in resolver.layout().iter().zip(&old_layout) {
            assert!(resolved.path.starts_with(new.path()));
            assert_ne!(resolved.path, stale.path);
        }
    }

    #[test]
    fn test_uncreatable_dir_is_soft_failure() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let resolver = PathResolver::new(prefix_of(&blocker));
        let resolved = resolver.resolve(DirKind::Log);

        assert_eq!(resolved.path, blocker.join("var/log/polly"));
        let warning = resolved.warning.expect("expected an access warning");
        assert!(matches!(
            warning.problems[0],
            AccessProblem::CreateFailed { .. }
        ));
        assert!(warning
            .problems
            .iter()
            .any(|p| matches!(p, AccessProblem::NotWritable { .. })));

        // the warning is cached along with the path
        assert_eq!(resolver.resolve(DirKind::Log).warning, Some(warning));
    }

    #[test]
    fn test_concurrent_resolution_agrees() {
        let temp = tempdir().unwrap();
        let resolver = Arc::new(PathResolver::new(prefix_of(temp.path())));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    resolver.pid_file_path()
                })
            })
            .collect();

        let paths: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(paths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("POLLY_HOME", "/srv/polly/");
        std::env::set_var("POLLY_LOG_FILE", "service.log");

        let config = Config::from_env().unwrap();
        assert_eq!(config.prefix.as_str(), "/srv/polly");
        assert_eq!(config.log_file.as_deref(), Some("service.log"));
        assert_eq!(config.resolver().prefix(), config.prefix);

        // Clean up
        std::env::remove_var("POLLY_HOME");
        std::env::remove_var("POLLY_LOG_FILE");
    }

    #[test]
    fn test_root_env_prefix_means_unprefixed() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("POLLY_LOG_FILE");
        std::env::set_var("POLLY_HOME", "/");

        let config = Config::from_env().unwrap();
        assert!(!config.prefix.is_set());
        assert!(!PathResolver::from_env().unwrap().is_prefixed());

        std::env::remove_var("POLLY_HOME");
    }

    #[test]
    fn test_non_unicode_prefix_env_is_rejected_everywhere() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("POLLY_LOG_FILE");
        std::env::set_var("POLLY_HOME", OsStr::from_bytes(b"/srv/\xffpolly"));

        assert!(Config::from_env().is_err());
        assert!(matches!(
            Prefix::from_env(),
            Err(polly_errors::ConfigError::EnvVarNotUnicode { .. })
        ));
        assert!(PathResolver::from_env().is_err());

        std::env::remove_var("POLLY_HOME");
    }

    #[test]
    fn test_invalid_log_file_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("POLLY_HOME");
        std::env::set_var("POLLY_LOG_FILE", "../escape.log");

        let result = Config::from_env();
        assert!(result.is_err());

        std::env::remove_var("POLLY_LOG_FILE");
    }

    proptest! {
        #[test]
        fn prop_set_prefix_roots_every_dir(segments in proptest::collection::vec("[a-z0-9_]{1,8}", 1..4)) {
            let temp = tempdir().unwrap();
            let prefix = temp.path().join(segments.join("/"));
            let resolver = PathResolver::default();

            prop_assert!(resolver.set_prefix(prefix.to_str().unwrap()));
            for kind in DirKind::ALL {
                prop_assert!(resolver.resolve(kind).path.starts_with(&prefix));
            }
        }

        #[test]
        fn prop_root_like_input_is_ignored(slashes in 0usize..4) {
            let mut prefix = Prefix::new("/opt/polly");
            prop_assert!(!prefix.set(&"/".repeat(slashes)));
            prop_assert_eq!(prefix.as_str(), "/opt/polly");
        }
    }
}
