//! Delegation to the real tool binary.
//!
//! The child inherits stdin, stdout and stderr directly and is waited on
//! synchronously, so terminal behavior matches a direct invocation.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, warn};

/// Directory holding the real tool binaries.
///
/// Fixed so the shim, installed elsewhere on `PATH`, can never resolve to
/// itself.
pub const TOOLS_DIR: &str = "/usr/local/bin";

/// Exit code when the real binary cannot be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code when the real binary exists but cannot be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Base for exit codes of processes killed by a signal (`128 + N`).
pub const EXIT_SIGNAL_BASE: i32 = 128;

/// Runs the real tool and reports its exit status.
pub trait Delegator {
    /// Blocks until the tool exits. Failures of the tool are data, not errors.
    fn delegate(&self, tool: &str, args: &[OsString]) -> i32;
}

/// Delegator launching `<TOOLS_DIR>/<tool>`.
#[derive(Debug, Clone)]
pub struct SystemDelegator {
    tools_dir: PathBuf,
    /// Canonical path of the running shim, if it can be determined.
    self_exe: Option<PathBuf>,
}

impl SystemDelegator {
    pub fn new() -> Self {
        Self {
            tools_dir: PathBuf::from(TOOLS_DIR),
            self_exe: current_exe(),
        }
    }

    #[cfg(test)]
    pub(crate) fn in_dir(tools_dir: impl Into<PathBuf>) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            self_exe: current_exe(),
        }
    }

    /// Whether `binary` resolves to the running shim (directly or via symlink).
    fn is_self(&self, binary: &Path) -> bool {
        match (&self.self_exe, fs::canonicalize(binary)) {
            (Some(exe), Ok(target)) => *exe == target,
            _ => false,
        }
    }

    /// Path of the real binary, or `None` if the name could escape the tools dir.
    fn binary_path(&self, tool: &str) -> Option<PathBuf> {
        let is_plain_name = !tool.is_empty()
            && tool != "."
            && tool != ".."
            && Path::new(tool).file_name().is_some_and(|name| name == tool);
        is_plain_name.then(|| self.tools_dir.join(tool))
    }
}

impl Default for SystemDelegator {
    fn default() -> Self {
        Self::new()
    }
}

impl Delegator for SystemDelegator {
    fn delegate(&self, tool: &str, args: &[OsString]) -> i32 {
        let Some(binary) = self.binary_path(tool) else {
            warn!("Refusing to delegate to invalid tool name {:?}", tool);
            return EXIT_NOT_FOUND;
        };

        if self.is_self(&binary) {
            warn!("Refusing to delegate to {:?}: it is this shim", binary);
            return EXIT_NOT_FOUND;
        }

        debug!("Delegating to {:?} with {} args", binary, args.len());
        match Command::new(&binary).args(args).status() {
            Ok(status) => exit_code(status),
            Err(e) => {
                warn!("Failed to launch {:?}: {}", binary, e);
                match e.kind() {
                    ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                    _ => EXIT_NOT_FOUND,
                }
            }
        }
    }
}

fn current_exe() -> Option<PathBuf> {
    std::env::current_exe()
        .and_then(fs::canonicalize)
        .map_err(|e| warn!("Cannot resolve own executable: {}", e))
        .ok()
}

/// Exit code a shell would report for a finished child.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return EXIT_SIGNAL_BASE + signal;
        }
    }

    1
}
