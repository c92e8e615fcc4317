//! runinstall - transparent build-tool shim.
//!
//! Invoked in place of `mvn`, `pipenv` or `poetry`, it provisions the tool
//! versions a repository asks for (once per directory and tool) and then runs
//! the real binary with the caller's arguments, reporting its exit code.

pub mod delegate;
pub mod error;
pub mod gate;
pub mod history;
pub mod install;
pub mod logging;
pub mod orchestrator;
pub mod resolve;

pub use error::{ResolveError, Result};
pub use orchestrator::{Orchestrator, RunOutcome, RunPath, SystemOrchestrator};
