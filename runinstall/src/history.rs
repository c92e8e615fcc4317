//! Run history: remembers which (directory, tool) pairs were provisioned.
//!
//! The store is a flat text file shared by every invocation on the host, one
//! `"<cwd> <tool>"` record per line. It is never compacted and never locked:
//! two concurrent first runs may both provision, and a concurrent
//! read-modify-write may drop the other writer's new line. Either outcome
//! only means provisioning runs again later.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Cross-invocation deduplication store.
pub trait RunHistory {
    /// Whether provisioning already ran for this pair.
    fn has_run(&self, cwd: &Path, tool: &str) -> bool;
    /// Remember that provisioning ran for this pair. Never fails the run.
    fn record_run(&self, cwd: &Path, tool: &str);
}

/// History backed by the shared temp-dir file.
#[derive(Debug, Clone)]
pub struct FileRunHistory {
    path: PathBuf,
}

impl FileRunHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole file as text; missing or unreadable is empty.
    ///
    /// Invalid UTF-8 is replaced rather than rejected so intact lines keep
    /// matching and survive the next rewrite.
    fn read_contents(&self) -> String {
        match fs::read(&self.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("History file {:?} not readable ({}), treating as empty", self.path, e);
                String::new()
            }
        }
    }
}

/// The exact line stored for a pair.
pub fn record_line(cwd: &Path, tool: &str) -> String {
    format!("{} {}", cwd.display(), tool)
}

impl RunHistory for FileRunHistory {
    fn has_run(&self, cwd: &Path, tool: &str) -> bool {
        let line = record_line(cwd, tool);
        self.read_contents().lines().any(|l| l == line)
    }

    fn record_run(&self, cwd: &Path, tool: &str) {
        let mut contents = self.read_contents();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(&record_line(cwd, tool));
        contents.push('\n');

        if let Err(e) = fs::write(&self.path, contents) {
            warn!("Failed to record run in {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn history_in(dir: &TempDir) -> FileRunHistory {
        FileRunHistory::new(dir.path().join("runinstall-history"))
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);
        assert!(!history.has_run(Path::new("/repo-y"), "mvn"));
        assert!(!history.path().exists());
    }

    #[test]
    fn test_record_then_has_run() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);

        history.record_run(Path::new("/repo-y"), "mvn");

        assert!(history.has_run(Path::new("/repo-y"), "mvn"));
        assert!(!history.has_run(Path::new("/repo-y"), "poetry"));
        assert!(!history.has_run(Path::new("/repo-y/sub"), "mvn"));
        assert_eq!(fs::read_to_string(history.path()).unwrap(), "/repo-y mvn\n");
    }

    #[test]
    fn test_records_are_appended_in_order() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);

        history.record_run(Path::new("/a"), "mvn");
        history.record_run(Path::new("/b"), "pipenv");
        history.record_run(Path::new("/a"), "poetry");

        assert_eq!(
            fs::read_to_string(history.path()).unwrap(),
            "/a mvn\n/b pipenv\n/a poetry\n"
        );
    }

    #[test]
    fn test_exact_line_match_only() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);
        fs::write(history.path(), "/repo mvn \n /repo mvn\n/repo mvnw\n").unwrap();

        assert!(!history.has_run(Path::new("/repo"), "mvn"));
    }

    #[test]
    fn test_existing_content_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);
        fs::write(history.path(), "/a mvn").unwrap();

        history.record_run(Path::new("/b"), "poetry");

        assert_eq!(fs::read_to_string(history.path()).unwrap(), "/a mvn\n/b poetry\n");
        assert!(history.has_run(Path::new("/a"), "mvn"));
    }

    #[test]
    fn test_corrupted_bytes_do_not_break_lookups() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);
        fs::write(history.path(), b"\xff\xfe garbage\n/repo pipenv\n").unwrap();

        assert!(history.has_run(Path::new("/repo"), "pipenv"));
        history.record_run(Path::new("/other"), "mvn");
        assert!(history.has_run(Path::new("/repo"), "pipenv"));
        assert!(history.has_run(Path::new("/other"), "mvn"));
    }

    #[test]
    fn test_unwritable_location_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let history = FileRunHistory::new(dir.path().join("missing").join("history"));

        history.record_run(Path::new("/repo"), "mvn");

        assert!(!history.has_run(Path::new("/repo"), "mvn"));
    }

    #[test]
    fn test_history_is_a_directory() {
        let dir = TempDir::new().unwrap();
        let history = FileRunHistory::new(dir.path());

        assert!(!history.has_run(Path::new("/repo"), "mvn"));
        history.record_run(Path::new("/repo"), "mvn");
    }
}
