//! External command execution
//!
//! Commands are launched directly from their token list, never through a
//! shell. Launch failures and abnormal exits are folded into the returned
//! [`CommandOutput`] rather than surfaced as errors, since every caller
//! treats them as "the command did not succeed".

use crate::probe::CommandLine;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Exited normally with this code
    Exited(i32),
    /// Terminated by a signal
    Signaled(i32),
    /// Could not be started at all
    LaunchFailed,
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ExitState::Exited(code),
            (None, Some(signal)) => ExitState::Signaled(signal),
            (None, None) => ExitState::LaunchFailed,
        }
    }
}

impl std::fmt::Display for ExitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitState::Exited(code) => write!(f, "exit {}", code),
            ExitState::Signaled(signal) => write!(f, "signal {}", signal),
            ExitState::LaunchFailed => write!(f, "launch failed"),
        }
    }
}

/// Result of running an external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitState,
    /// Standard output followed by standard error
    pub output: String,
    pub duration: Duration,
}

impl CommandOutput {
    /// Whether the command exited with status zero
    pub fn success(&self) -> bool {
        self.status == ExitState::Exited(0)
    }

    /// Output for a command that never started
    pub fn launch_failed(message: impl Into<String>) -> Self {
        Self {
            status: ExitState::LaunchFailed,
            output: message.into(),
            duration: Duration::ZERO,
        }
    }
}

/// Runs command lines on behalf of the monitor
pub trait CommandRunner {
    /// Run a command to completion and capture its combined output
    fn run(&self, command: &CommandLine) -> CommandOutput;
}

/// Runs commands as child processes of this one
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> CommandOutput {
        let Some(program) = command.program() else {
            return CommandOutput::launch_failed("empty command");
        };

        tracing::debug!(command = %command, "running");
        let start = Instant::now();

        let result = Command::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .output();

        let output = match result {
            Ok(out) => CommandOutput {
                status: out.status.into(),
                output: format!(
                    "{}{}",
                    String::from_utf8_lossy(&out.stdout),
                    String::from_utf8_lossy(&out.stderr)
                ),
                duration: start.elapsed(),
            },
            Err(e) => CommandOutput::launch_failed(format!("failed to execute {}: {}", program, e)),
        };

        tracing::debug!(
            command = %command,
            status = %output.status,
            duration_ms = output.duration.as_millis() as u64,
            "finished"
        );
        output
    }
}

/// In-memory runner for exercising the monitor without spawning processes
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Succeeds for every command except those marked as failing, and
    /// records each command it is asked to run
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        failing: Vec<CommandLine>,
        calls: RefCell<Vec<CommandLine>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make `command` exit 1
        pub fn failing(mut self, command: &CommandLine) -> Self {
            self.failing.push(command.clone());
            self
        }

        /// Commands run so far, in order
        pub fn calls(&self) -> Vec<CommandLine> {
            self.calls.borrow().clone()
        }

        /// Number of times `command` was run
        pub fn count(&self, command: &CommandLine) -> usize {
            self.calls.borrow().iter().filter(|c| *c == command).count()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &CommandLine) -> CommandOutput {
            self.calls.borrow_mut().push(command.clone());
            let status = if self.failing.contains(command) {
                ExitState::Exited(1)
            } else {
                ExitState::Exited(0)
            };
            CommandOutput {
                status,
                output: format!("{} -> {}\n", command, status),
                duration: Duration::ZERO,
            }
        }
    }
}
