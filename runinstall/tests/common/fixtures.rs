use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const CONFIG_VARS: &[&str] = &[
    "RUNINSTALL_CMD",
    "RUNINSTALL_LOG_LEVEL",
    "RUNINSTALL_LOG_FILE",
    "RUNINSTALL_HISTORY_FILE",
    "RUNINSTALL_MATCH",
    "RUNINSTALL_INSTALL_TOOL",
    "RUNINSTALL_SKIP_VERSION",
];

/// Isolated project directory, log file and history file for one shim run.
pub struct ShimEnv {
    pub dir: TempDir,
    pub project: PathBuf,
    pub log_file: PathBuf,
    pub history_file: PathBuf,
}

impl ShimEnv {
    pub fn new() -> Self {
        crate::test_log!("FIXTURE: Creating shim environment");

        let dir = TempDir::new().expect("Failed to create temp dir");
        let project = dir.path().join("project");
        fs::create_dir_all(&project).expect("Failed to create project dir");
        let project = project
            .canonicalize()
            .expect("Failed to canonicalize project dir");
        let log_file = dir.path().join("runinstall.log");
        let history_file = dir.path().join("history");

        Self {
            dir,
            project,
            log_file,
            history_file,
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> &Self {
        fs::write(self.project.join(name), contents).expect("Failed to write project file");
        self
    }

    /// Base command for the shim invoked as `tool`, with a scrubbed config.
    pub fn command(&self, tool: &str) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_runinstall"));
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.project)
            .env("RUNINSTALL_CMD", tool)
            .env("RUNINSTALL_LOG_FILE", &self.log_file)
            .env("RUNINSTALL_HISTORY_FILE", &self.history_file)
            .env("RUNINSTALL_INSTALL_TOOL", "runinstall-test-no-such-installer")
            .env("RUNINSTALL_LOG_LEVEL", "debug")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    pub fn run(&self, tool: &str, args: &[&str]) -> Output {
        self.command(tool)
            .args(args)
            .output()
            .expect("Failed to run runinstall")
    }

    pub fn log(&self) -> String {
        read_or_empty(&self.log_file)
    }

    pub fn history(&self) -> String {
        read_or_empty(&self.history_file)
    }
}

fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
