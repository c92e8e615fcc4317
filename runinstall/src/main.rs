//! runinstall shim entry point.
//!
//! Takes no flags of its own: every argument after `argv[0]` belongs to the
//! delegated tool.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use runinstall::SystemOrchestrator;
use runinstall::delegate::{Delegator, SystemDelegator};
use runinstall::logging::{init_logging, shutdown};
use runinstall_common::{Invocation, ShimConfig};
use std::ffi::OsString;
use tracing::{debug, error, warn};

fn main() {
    let mut argv = std::env::args_os();
    let argv0 = argv
        .next()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_default();
    let args: Vec<OsString> = argv.collect();

    let (config, env_errors) = ShimConfig::from_env(&argv0);
    let guard = init_logging(&config);
    for e in &env_errors {
        warn!("Ignoring invalid configuration: {}", e);
    }
    for var in &config.env_overrides {
        debug!(source = "environment", "Configuration value from {}", var);
    }

    let code = match run(&config, args.clone()) {
        Ok(code) => code,
        Err(e) => {
            // Provisioning is optional; running the tool is not.
            error!("Shim setup failed, delegating directly: {:#}", e);
            SystemDelegator::new().delegate(&config.tool_name, &args)
        }
    };

    shutdown(guard, code)
}

fn run(config: &ShimConfig, args: Vec<OsString>) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let invocation = Invocation::new(config.tool_name.clone(), args, cwd);
    debug!("Invoked as `{}` in {:?}", invocation.command, invocation.cwd);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    let orchestrator = SystemOrchestrator::from_config(config);
    let outcome = runtime.block_on(orchestrator.run(&invocation));
    debug!("Run finished via {:?} with exit code {}", outcome.path, outcome.exit_code);

    Ok(outcome.exit_code)
}
