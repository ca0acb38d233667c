use std::path::Path;
use std::process::Command;

use crate::error::Error;

/// Remote URL and checked-out commit of a build-data checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsProvenance {
    /// URL of the `origin` remote
    pub remote_url: String,
    /// Full hash of `HEAD`
    pub commit: String,
}

/// Run `git <args>` inside `dir` and return trimmed stdout
///
/// This uses the system git command. Each query runs exactly once; a failure
/// is reported rather than retried.
fn git_query(dir: &Path, args: &[&str]) -> Result<String, Error> {
    let command = args.join(" ");
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::Vcs {
            command: command.clone(),
            dir: dir.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Vcs {
            command,
            dir: dir.to_path_buf(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Read the `origin` remote URL of the repository at `dir`
pub fn remote_url(dir: &Path) -> Result<String, Error> {
    git_query(dir, &["remote", "get-url", "origin"])
}

/// Read the commit hash of `HEAD` in the repository at `dir`
pub fn head_commit(dir: &Path) -> Result<String, Error> {
    git_query(dir, &["rev-parse", "HEAD"])
}

/// Read remote URL and commit hash of the repository at `dir`
///
/// Fails if `dir` is not a git repository, has no `origin` remote, or has no
/// commits.
pub fn read_provenance(dir: &Path) -> Result<VcsProvenance, Error> {
    if !dir.is_dir() {
        return Err(Error::Vcs {
            command: "rev-parse HEAD".to_string(),
            dir: dir.to_path_buf(),
            stderr: "directory does not exist".to_string(),
        });
    }
    let commit = head_commit(dir)?;
    let remote_url = remote_url(dir)?;
    Ok(VcsProvenance { remote_url, commit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_read_provenance_from_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "dev@example.com"]);
        git(dir, &["config", "user.name", "Dev"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
        git(dir, &["remote", "add", "origin", "https://example.com/build-data.git"]);
        fs::write(dir.join("info.json"), "{}").unwrap();
        git(dir, &["add", "info.json"]);
        git(dir, &["commit", "-q", "-m", "init"]);

        let provenance = read_provenance(dir).unwrap();

        assert_eq!(provenance.remote_url, "https://example.com/build-data.git");
        assert_eq!(provenance.commit.len(), 40);
        assert!(provenance.commit.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_read_provenance_not_a_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let err = read_provenance(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Vcs { .. }));
    }

    #[test]
    fn test_read_provenance_missing_directory() {
        let err = read_provenance(Path::new("/nonexistent/build-data")).unwrap_err();
        let display = err.to_string();
        assert!(display.contains("/nonexistent/build-data"));
        assert!(display.contains("directory does not exist"));
    }
}
