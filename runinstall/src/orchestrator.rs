//! End-to-end run: gate, history, provisioning, delegation, logging.
//!
//! ```text
//! gate false ─────────────────────────────────────────────► delegate ─► exit
//! gate true ─► unsupported tool ─► error event ─────────────────────► exit -1
//!          └─► history hit ─────────────────────► delegate ─► "skipped" ─► exit
//!          └─► history miss ─► record ─► resolve ─► plan ─► install
//!                                        └──────────────► delegate ─► result ─► exit
//! ```
//!
//! Provisioning is best-effort: a resolution error or failed install is
//! recorded in the event and the real tool still runs.

use crate::delegate::{Delegator, SystemDelegator};
use crate::gate::{ActivationGate, PathGate};
use crate::history::{FileRunHistory, RunHistory};
use crate::install::{self, CommandInstaller, Installer};
use crate::logging::{EventSink, TracingSink};
use crate::resolve::{ConstraintResolver, RepositoryResolver};
use runinstall_common::{Invocation, LogEvent, ShimConfig};
use tracing::{debug, warn};

/// Exit code for a tool outside the supported set.
pub const EXIT_UNSUPPORTED_TOOL: i32 = -1;

pub const MESSAGE_RESULT: &str = "runinstall result";
pub const MESSAGE_SKIPPED: &str = "runinstall skipped";
pub const MESSAGE_UNKNOWN: &str = "Unknown command";

/// Which way a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPath {
    /// Gate closed; pure passthrough.
    Bypassed,
    /// Tool not supported; nothing was delegated.
    Unsupported,
    /// Already provisioned for this directory and tool.
    Skipped,
    /// Provisioning attempted, then delegated.
    Provisioned,
}

/// Result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub path: RunPath,
    pub exit_code: i32,
}

/// The shim's components, wired together.
pub struct Orchestrator<G, H, R, I, D, S> {
    pub gate: G,
    pub history: H,
    pub resolver: R,
    pub installer: I,
    pub delegator: D,
    pub sink: S,
    /// Program named in planned install commands.
    pub install_tool: String,
}

/// The production wiring.
pub type SystemOrchestrator = Orchestrator<
    PathGate,
    FileRunHistory,
    RepositoryResolver,
    CommandInstaller,
    SystemDelegator,
    TracingSink,
>;

impl SystemOrchestrator {
    pub fn from_config(config: &ShimConfig) -> Self {
        Orchestrator {
            gate: PathGate::new(&config.match_patterns),
            history: FileRunHistory::new(&config.history_file),
            resolver: RepositoryResolver,
            installer: CommandInstaller::new(&config.install_tool, config.skip_version_check),
            delegator: SystemDelegator::new(),
            sink: TracingSink,
            install_tool: config.install_tool.clone(),
        }
    }
}

impl<G, H, R, I, D, S> Orchestrator<G, H, R, I, D, S>
where
    G: ActivationGate,
    H: RunHistory,
    R: ConstraintResolver,
    I: Installer,
    D: Delegator,
    S: EventSink,
{
    pub async fn run(&self, invocation: &Invocation) -> RunOutcome {
        if !self.gate.should_intercept(&invocation.cwd) {
            debug!("{:?} not matched, passing through", invocation.cwd);
            return RunOutcome {
                path: RunPath::Bypassed,
                exit_code: self.delegate(invocation),
            };
        }

        let Some(tool) = invocation.tool() else {
            self.sink
                .emit(&LogEvent::for_invocation(invocation, MESSAGE_UNKNOWN).as_error());
            return RunOutcome {
                path: RunPath::Unsupported,
                exit_code: EXIT_UNSUPPORTED_TOOL,
            };
        };

        if self.history.has_run(&invocation.cwd, tool.name()) {
            let exit_code = self.delegate(invocation);
            let mut event = LogEvent::for_invocation(invocation, MESSAGE_SKIPPED);
            event.run_success = Some(exit_code == 0);
            self.sink.emit(&event);
            return RunOutcome {
                path: RunPath::Skipped,
                exit_code,
            };
        }

        self.history.record_run(&invocation.cwd, tool.name());

        let mut event = LogEvent::for_invocation(invocation, MESSAGE_RESULT);
        match self.resolver.resolve(tool, &invocation.cwd).await {
            Ok(constraints) => {
                let commands = install::plan(&constraints, &self.install_tool);
                if !commands.is_empty() {
                    event.install_success = Some(self.installer.install(&commands).await);
                }
                event.constraints = Some(constraints);
                event.install_commands = Some(commands);
            }
            Err(e) => {
                warn!("Constraint resolution for {} failed: {}", tool, e);
                event.detail = Some(e.to_string());
            }
        }

        let exit_code = self.delegate(invocation);
        event.run_success = Some(exit_code == 0);
        self.sink.emit(&event);

        RunOutcome {
            path: RunPath::Provisioned,
            exit_code,
        }
    }

    fn delegate(&self, invocation: &Invocation) -> i32 {
        self.delegator
            .delegate(&invocation.tool_name, &invocation.args)
    }
}
