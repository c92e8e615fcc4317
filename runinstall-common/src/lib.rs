//! Shared types and configuration for the runinstall shim.

pub mod config;
pub mod types;
pub mod util;

pub use config::{ConfigSource, EnvError, ShimConfig, Sourced};
pub use types::{ConstraintTool, InstallCommand, Invocation, LogEvent, Tool, ToolConstraint};
pub use util::mask_sensitive_args;
