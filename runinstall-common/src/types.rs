//! Common types used across runinstall components.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// A build tool the shim knows how to provision.
///
/// Adding a tool means adding a variant here and a resolver arm in the
/// `runinstall` crate; the compiler points at every place that must change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Apache Maven (`mvn`).
    Mvn,
    /// Pipenv (`pipenv`).
    Pipenv,
    /// Poetry (`poetry`).
    Poetry,
}

impl Tool {
    /// Every supported tool, in a stable order.
    pub const ALL: [Tool; 3] = [Tool::Mvn, Tool::Pipenv, Tool::Poetry];

    /// Look up a tool by the name it is invoked as.
    ///
    /// Returns `None` for anything outside the supported set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mvn" => Some(Self::Mvn),
            "pipenv" => Some(Self::Pipenv),
            "poetry" => Some(Self::Poetry),
            _ => None,
        }
    }

    /// The executable name of this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mvn => "mvn",
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tool that can appear in a version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintTool {
    Java,
    Maven,
    Python,
    Pipenv,
    Poetry,
}

impl ConstraintTool {
    /// Name understood by the install tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Maven => "maven",
            Self::Python => "python",
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
        }
    }
}

impl fmt::Display for ConstraintTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A required version of a tool, as found in repository contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConstraint {
    /// Tool the constraint applies to.
    pub tool: ConstraintTool,
    /// Version specification, verbatim from the source file.
    pub constraint: String,
    /// File the constraint was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ToolConstraint {
    pub fn new(tool: ConstraintTool, constraint: impl Into<String>) -> Self {
        Self {
            tool,
            constraint: constraint.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ToolConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.tool, self.constraint)
    }
}

/// A single command of an install plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Shell-quoted rendering, for logs only.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| shell_escape::escape(part.into()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One invocation of the shim. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name the shim was invoked as (may be unsupported).
    pub tool_name: String,
    /// Arguments to forward verbatim, byte for byte.
    pub args: Vec<OsString>,
    /// Absolute working directory.
    pub cwd: PathBuf,
    /// Originating command line with sensitive values masked, for logs.
    pub command: String,
}

impl Invocation {
    pub fn new<I, A>(tool_name: impl Into<String>, args: I, cwd: PathBuf) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let tool_name = tool_name.into();
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let lossy: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        let command = std::iter::once(tool_name.clone())
            .chain(crate::util::mask_sensitive_args(&lossy))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            tool_name,
            args,
            cwd,
            command,
        }
    }

    /// The supported tool this invocation targets, if any.
    pub fn tool(&self) -> Option<Tool> {
        Tool::from_name(&self.tool_name)
    }

    /// Arguments as text, for logs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// The single structured record emitted per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Whether this is an error event.
    #[serde(default)]
    pub error: bool,
    pub cwd: String,
    pub tool: String,
    /// Arguments, with sensitive values masked.
    pub args: Vec<String>,
    /// Masked command line as invoked.
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<ToolConstraint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_commands: Option<Vec<InstallCommand>>,
    /// `None` when no install was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_success: Option<bool>,
    /// Failure detail for provisioning, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub message: String,
}

impl LogEvent {
    /// Event carrying only the invocation metadata.
    pub fn for_invocation(invocation: &Invocation, message: impl Into<String>) -> Self {
        Self {
            error: false,
            cwd: invocation.cwd.display().to_string(),
            tool: invocation.tool_name.clone(),
            args: crate::util::mask_sensitive_args(&invocation.args_lossy()),
            command: invocation.command.clone(),
            constraints: None,
            install_commands: None,
            install_success: None,
            run_success: None,
            detail: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn as_error(mut self) -> Self {
        self.error = true;
        self
    }
}
