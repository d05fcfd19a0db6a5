use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Files whose change means HEAD moved: `HEAD` itself, the ref it points at,
/// and `packed-refs` for refs that were packed away
fn git_watch_paths() -> Vec<String> {
    let mut paths = Vec::new();
    let Some(head) = git(&["rev-parse", "--git-path", "HEAD"]) else {
        return paths;
    };
    if let Ok(contents) = std::fs::read_to_string(&head) {
        if let Some(reference) = contents.trim().strip_prefix("ref: ") {
            paths.extend(git(&["rev-parse", "--git-path", reference]));
        }
    }
    paths.extend(git(&["rev-parse", "--git-path", "packed-refs"]));
    paths.push(head);
    paths
}

fn main() {
    // Packagers may pin these instead of relying on a git checkout
    let branch = env::var("POLLY_GIT_BRANCH")
        .ok()
        .or_else(|| git(&["rev-parse", "--abbrev-ref", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());
    let commit = env::var("POLLY_GIT_COMMIT")
        .ok()
        .or_else(|| git(&["rev-parse", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());
    let epoch = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| i64::try_from(d.as_secs()).unwrap_or(0))
                .unwrap_or(0)
        });

    println!("cargo:rustc-env=POLLY_GIT_BRANCH={branch}");
    println!("cargo:rustc-env=POLLY_GIT_COMMIT={commit}");
    println!("cargo:rustc-env=POLLY_BUILD_EPOCH={epoch}");

    println!("cargo:rerun-if-env-changed=POLLY_GIT_BRANCH");
    println!("cargo:rerun-if-env-changed=POLLY_GIT_COMMIT");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    // Any rerun-if line turns off cargo's default of rerunning on every
    // package change, so list what the values above depend on
    for path in git_watch_paths() {
        println!("cargo:rerun-if-changed={path}");
    }
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");
}
