//! Recovery actions for health check failures
//!
//! After an unhealthy check the monitor optionally captures diagnostics,
//! optionally applies a remedy, then optionally cools down. Each step is
//! best-effort: a failing action is reported and the sequence continues.

use crate::exec::{CommandOutput, CommandRunner};
use crate::node::ResolvedTarget;
use crate::probe::{CommandLine, CommandSet};
use std::fmt;
use std::time::{Duration, Instant};

/// Recovery configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Run the debug command, if the target has one
    pub enable_debug: bool,
    /// Run the remedy command, if the target has one
    pub enable_remedy: bool,
    /// Pause after the reactions (seconds)
    pub cooldown: u64,
}

impl RecoveryConfig {
    /// Get cooldown as Duration
    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_secs(self.cooldown)
    }
}

/// Kind of reaction to an unhealthy component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Debug,
    Remedy,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Debug => write!(f, "debug"),
            ActionKind::Remedy => write!(f, "remedy"),
        }
    }
}

/// What happened to a single reaction step
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Not enabled for this invocation
    Disabled,
    /// Enabled, but the target has no such command
    Unavailable,
    /// Ran and exited zero
    Succeeded,
    /// Ran and did not succeed
    Failed(CommandOutput),
}

impl ActionOutcome {
    /// Whether the command was actually run
    pub fn attempted(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded | ActionOutcome::Failed(_))
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Disabled => write!(f, "disabled"),
            ActionOutcome::Unavailable => write!(f, "unavailable"),
            ActionOutcome::Succeeded => write!(f, "succeeded"),
            ActionOutcome::Failed(output) => write!(f, "failed ({})", output.status),
        }
    }
}

/// Outcome of the full reaction sequence
#[derive(Debug, Clone)]
pub struct RecoveryReport {
    pub debug: ActionOutcome,
    pub remedy: ActionOutcome,
    /// Time actually spent cooling down
    pub cooled_down: Duration,
}

/// Reaction engine for one unhealthy target
pub struct Recovery<'a, R: CommandRunner> {
    target: &'a ResolvedTarget,
    commands: &'a CommandSet,
    config: &'a RecoveryConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Recovery<'a, R> {
    pub fn new(
        target: &'a ResolvedTarget,
        commands: &'a CommandSet,
        config: &'a RecoveryConfig,
        runner: &'a R,
    ) -> Self {
        Self {
            target,
            commands,
            config,
            runner,
        }
    }

    /// Run debug, then remedy, then cool down
    pub fn run(&self) -> RecoveryReport {
        let debug = self.perform(ActionKind::Debug, self.config.enable_debug, &self.commands.debug);
        let remedy = self.perform(
            ActionKind::Remedy,
            self.config.enable_remedy,
            &self.commands.remedy,
        );
        let cooled_down = self.cool_down();

        RecoveryReport {
            debug,
            remedy,
            cooled_down,
        }
    }

    /// Run one reaction step if enabled and available
    fn perform(&self, kind: ActionKind, enabled: bool, command: &CommandLine) -> ActionOutcome {
        if !enabled {
            return ActionOutcome::Disabled;
        }
        if !command.is_available() {
            tracing::debug!(resolved = %self.target, "no {} action available", kind);
            return ActionOutcome::Unavailable;
        }

        tracing::info!(resolved = %self.target, command = %command, "running {} action", kind);
        let output = self.runner.run(command);
        if output.success() {
            ActionOutcome::Succeeded
        } else {
            println!(
                "{} action [{}] for {} failed: {}",
                kind, command, self.target, output.output
            );
            ActionOutcome::Failed(output)
        }
    }

    /// Block for the configured cool-down period
    fn cool_down(&self) -> Duration {
        if self.config.cooldown == 0 {
            return Duration::ZERO;
        }

        let period = self.config.cooldown_duration();
        tracing::info!(resolved = %self.target, seconds = self.config.cooldown, "cooling down");
        let start = Instant::now();
        std::thread::sleep(period);
        start.elapsed()
    }
}
