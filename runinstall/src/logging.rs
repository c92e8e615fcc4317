//! Structured logging, the per-run event sink, and flushing shutdown.
//!
//! Logs go to a JSON file through a non-blocking writer; the user's terminal
//! belongs to the delegated tool.

use runinstall_common::{LogEvent, ShimConfig};
use serde::Serialize;
use std::fs::OpenOptions;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tracing target of per-run events.
pub const EVENT_TARGET: &str = "runinstall::event";

/// Install the JSON file subscriber.
///
/// Returns the guard that flushes buffered events when dropped, or `None` if
/// the log file could not be opened (logging is then disabled).
pub fn init_logging(config: &ShimConfig) -> Option<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(log_filter(&config.log_level))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(false),
        )
        .try_init()
        .ok()?;

    Some(guard)
}

/// Filter for the configured level.
///
/// The level only governs diagnostics; events on [`EVENT_TARGET`] always pass.
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!("{level},{EVENT_TARGET}=trace"))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{EVENT_TARGET}=trace")))
}

/// Flush every buffered log event, then exit with `code`.
pub fn shutdown(guard: Option<WorkerGuard>, code: i32) -> ! {
    drop(guard);
    std::process::exit(code)
}

/// Receives the one [`LogEvent`] of a run.
pub trait EventSink {
    fn emit(&self, event: &LogEvent);
}

/// Sink writing events as tracing records on [`EVENT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

fn json_field<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

impl EventSink for TracingSink {
    fn emit(&self, event: &LogEvent) {
        let args = json_field(&event.args);
        let constraints = json_field(&event.constraints);
        let install_commands = json_field(&event.install_commands);
        let install_success = json_field(&event.install_success);
        let run_success = json_field(&event.run_success);
        let detail = event.detail.as_deref().unwrap_or_default();

        if event.error {
            error!(
                target: EVENT_TARGET,
                cwd = %event.cwd,
                tool = %event.tool,
                command = %event.command,
                args = %args,
                detail = %detail,
                "{}",
                event.message
            );
        } else {
            info!(
                target: EVENT_TARGET,
                cwd = %event.cwd,
                tool = %event.tool,
                command = %event.command,
                args = %args,
                constraints = %constraints,
                install_commands = %install_commands,
                install_success = %install_success,
                run_success = %run_success,
                detail = %detail,
                "{}",
                event.message
            );
        }
    }
}
