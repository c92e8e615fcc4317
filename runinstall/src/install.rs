//! Install planning and best-effort execution.
//!
//! Planning turns constraints into `install-tool <tool> <version>` commands.
//! Execution never aborts the run: every failure, including a missing install
//! tool, collapses into `false`.

use runinstall_common::{InstallCommand, ToolConstraint};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Map constraints to an ordered, duplicate-free list of install commands.
///
/// Constraints that do not pin a lowest version (`*`, upper bounds only)
/// produce no command.
pub fn plan(constraints: &[ToolConstraint], install_tool: &str) -> Vec<InstallCommand> {
    let mut commands: Vec<InstallCommand> = Vec::new();
    for constraint in constraints {
        let Some(version) = pinned_version(&constraint.constraint) else {
            debug!("Cannot pin a version for {}, skipping", constraint);
            continue;
        };
        let command = InstallCommand::new(
            install_tool,
            vec![constraint.tool.name().to_string(), version],
        );
        if !commands.contains(&command) {
            commands.push(command);
        }
    }
    commands
}

/// Lowest concrete version a constraint admits.
///
/// Handles the common Maven/PEP 440/Poetry forms: `3.9.0`, `==3.11.4`,
/// `>=3.9,<4`, `~=3.10`, `^3.10`, `~1.8`, `3.11.*`, `v17`. Alternatives
/// (`^3.8 || ^3.9`) use the first branch.
pub fn pinned_version(constraint: &str) -> Option<String> {
    let first = constraint.split("||").next()?.split(',').next()?.trim();

    let mut rest = first;
    for op in ["===", "==", ">=", "~=", "^", "~", "="] {
        if let Some(stripped) = rest.strip_prefix(op) {
            rest = stripped;
            break;
        }
    }
    let mut version = rest.trim().trim_start_matches('v');

    while let Some(stripped) = version.strip_suffix(".*") {
        version = stripped;
    }

    let valid = version.chars().next().is_some_and(|c| c.is_ascii_digit())
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
    valid.then(|| version.to_string())
}

/// Executes an install plan.
#[allow(async_fn_in_trait)]
pub trait Installer {
    /// Run every command; `true` only if all of them succeeded.
    async fn install(&self, commands: &[InstallCommand]) -> bool;
}

/// Installer spawning each command as a child process.
///
/// Output is captured and logged, never shown on the user's terminal.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    install_tool: String,
    skip_version_check: bool,
}

impl CommandInstaller {
    pub fn new(install_tool: impl Into<String>, skip_version_check: bool) -> Self {
        Self {
            install_tool: install_tool.into(),
            skip_version_check,
        }
    }

    /// Check the install tool exists and answers `--version`.
    async fn install_tool_available(&self) -> bool {
        let path = match which::which(&self.install_tool) {
            Ok(path) => path,
            Err(e) => {
                warn!("Install tool {} not found: {}", self.install_tool, e);
                return false;
            }
        };

        match Command::new(&path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                debug!(
                    "Install tool {:?} version {}",
                    path,
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                true
            }
            Ok(output) => {
                warn!("Install tool {:?} version check exited with {}", path, output.status);
                false
            }
            Err(e) => {
                warn!("Install tool {:?} version check failed: {}", path, e);
                false
            }
        }
    }

    async fn run_one(&self, command: &InstallCommand) -> bool {
        info!("Installing: {}", command.display());

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                debug!(
                    "Install succeeded: {}",
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                true
            }
            Ok(output) => {
                warn!(
                    "Install command {} exited with {}: {}",
                    command.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                warn!("Failed to run install command {}: {}", command.display(), e);
                false
            }
        }
    }
}

impl Installer for CommandInstaller {
    async fn install(&self, commands: &[InstallCommand]) -> bool {
        if !self.skip_version_check && !self.install_tool_available().await {
            return false;
        }

        let mut success = true;
        for command in commands {
            // Later tools are still attempted after a failure.
            success &= self.run_one(command).await;
        }
        success
    }
}
