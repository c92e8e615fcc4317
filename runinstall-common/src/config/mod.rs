//! Configuration system for runinstall.
//!
//! This module provides:
//! - Environment variable parsing with type safety
//! - Source tracking for debugging
//! - The immutable [`ShimConfig`] handed to every component

pub mod env;
pub mod shim;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use shim::{DEFAULT_INSTALL_TOOL, ShimConfig, tool_name_from_argv0};
pub use source::{ConfigSource, Sourced};

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}
