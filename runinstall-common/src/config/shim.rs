//! The immutable startup configuration of one shim run.

use super::env::{EnvError, EnvParser};
use super::source::{ConfigSource, Sourced};
use std::path::{Path, PathBuf};

/// Default program used to execute install commands.
pub const DEFAULT_INSTALL_TOOL: &str = "install-tool";

const LOG_FILE_NAME: &str = "runinstall.log";
const HISTORY_FILE_NAME: &str = "runinstall-history";

/// Everything a run needs from the process environment.
///
/// Built exactly once at startup and handed to each component; nothing else
/// reads environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimConfig {
    /// Tool the shim was invoked as.
    pub tool_name: String,
    /// Tracing filter level.
    pub log_level: String,
    /// Structured log destination.
    pub log_file: PathBuf,
    /// Shared run-history file.
    pub history_file: PathBuf,
    /// Activation globs; empty matches every directory.
    pub match_patterns: Vec<String>,
    /// Program that executes install commands.
    pub install_tool: String,
    /// Skip the install tool's `--version` self-check.
    pub skip_version_check: bool,
    /// Variables that supplied a value, in read order.
    pub env_overrides: Vec<String>,
}

impl ShimConfig {
    /// Defaults for a tool name, ignoring the environment.
    pub fn defaults(tool_name: impl Into<String>) -> Self {
        let temp = std::env::temp_dir();
        Self {
            tool_name: tool_name.into(),
            log_level: "info".to_string(),
            log_file: temp.join(LOG_FILE_NAME),
            history_file: temp.join(HISTORY_FILE_NAME),
            match_patterns: Vec::new(),
            install_tool: DEFAULT_INSTALL_TOOL.to_string(),
            skip_version_check: true,
            env_overrides: Vec::new(),
        }
    }

    /// Read the configuration from `RUNINSTALL_*` variables.
    ///
    /// `argv0` names the tool when `RUNINSTALL_CMD` is unset, so a symlink
    /// `mvn -> runinstall` intercepts `mvn`. Invalid values fall back to their
    /// defaults and are returned for reporting once logging is up.
    pub fn from_env(argv0: &str) -> (Self, Vec<EnvError>) {
        let defaults = Self::defaults(tool_name_from_argv0(argv0));
        let mut parser = EnvParser::new();

        let mut overrides = Overrides::default();

        let config = Self {
            tool_name: overrides
                .take(parser.get_optional_string("CMD"))
                .unwrap_or(defaults.tool_name),
            log_level: overrides.take(parser.get_log_level("LOG_LEVEL", &defaults.log_level)),
            log_file: overrides.take(parser.get_path("LOG_FILE", defaults.log_file)),
            history_file: overrides.take(parser.get_path("HISTORY_FILE", defaults.history_file)),
            match_patterns: overrides.take(parser.get_string_list("MATCH", defaults.match_patterns)),
            install_tool: overrides
                .take(parser.get_optional_string("INSTALL_TOOL"))
                .unwrap_or(defaults.install_tool),
            skip_version_check: overrides
                .take(parser.get_bool("SKIP_VERSION", defaults.skip_version_check)),
            env_overrides: overrides.0,
        };

        (config, parser.take_errors())
    }
}

/// Collects the variables behind environment-sourced values.
#[derive(Default)]
struct Overrides(Vec<String>);

impl Overrides {
    fn take<T>(&mut self, sourced: Sourced<T>) -> T {
        if sourced.source == ConfigSource::Environment
            && let Some(var) = sourced.env_var
        {
            self.0.push(var);
        }
        sourced.value
    }
}

/// File name component of `argv[0]`.
pub fn tool_name_from_argv0(argv0: &str) -> String {
    Path::new(argv0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| argv0.to_string())
}
