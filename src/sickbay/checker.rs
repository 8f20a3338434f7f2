//! Health check execution
//!
//! Runs the health check command once and classifies the component from the
//! command's exit status alone. Output is kept for diagnostics but never
//! parsed.

use crate::exec::{CommandOutput, CommandRunner};
use crate::node::ResolvedTarget;
use crate::probe::CommandLine;

/// Health status of the monitored component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Health check exited with status zero
    Healthy,
    /// Health check failed, timed out, or could not be started
    Unhealthy,
}

impl HealthStatus {
    /// Process exit status reported to the supervisor
    pub fn exit_code(&self) -> i32 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Unhealthy => 1,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Result of a single health check execution
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: HealthStatus,
    pub output: CommandOutput,
}

impl CheckResult {
    /// Get a summary string for this check result
    pub fn summary(&self) -> String {
        let duration_ms = self.output.duration.as_millis();
        match self.output.output.lines().next() {
            Some(first) if !first.is_empty() => format!(
                "{} ({}, {}ms) - {}",
                self.status, self.output.status, duration_ms, first
            ),
            _ => format!("{} ({}, {}ms)", self.status, self.output.status, duration_ms),
        }
    }
}

/// Health checker for a single resolved target
pub struct HealthChecker<'a, R: CommandRunner> {
    target: &'a ResolvedTarget,
    command: &'a CommandLine,
    runner: &'a R,
}

impl<'a, R: CommandRunner> HealthChecker<'a, R> {
    /// Create a checker running `command` against `target`
    pub fn new(target: &'a ResolvedTarget, command: &'a CommandLine, runner: &'a R) -> Self {
        Self {
            target,
            command,
            runner,
        }
    }

    /// Run the health check once
    pub fn check(&self) -> CheckResult {
        let output = self.runner.run(self.command);
        let status = if output.success() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };

        let result = CheckResult { status, output };
        tracing::info!(resolved = %self.target, "health check: {}", result.summary());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExitState, SystemRunner};
    use std::time::Duration;

    #[test]
    fn test_health_status_display() {
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
        assert_eq!(HealthStatus::Unhealthy.to_string(), "unhealthy");
    }

    #[test]
    fn test_health_status_exit_codes() {
        assert_eq!(HealthStatus::Healthy.exit_code(), 0);
        assert_eq!(HealthStatus::Unhealthy.exit_code(), 1);
    }

    #[test]
    fn test_check_healthy() {
        let target = ResolvedTarget::Kubelet;
        let command = CommandLine::new(["true"]);
        let result = HealthChecker::new(&target, &command, &SystemRunner).check();
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_check_unhealthy_keeps_output() {
        let target = ResolvedTarget::ContainerRuntime("containerd".to_string());
        let command = CommandLine::new(["sh", "-c", "echo connection refused >&2; exit 1"]);
        let result = HealthChecker::new(&target, &command, &SystemRunner).check();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.output.output, "connection refused\n");
    }

    #[test]
    fn test_check_ignores_output_content() {
        let target = ResolvedTarget::Kubelet;
        let command = CommandLine::new(["echo", "error: unhealthy"]);
        let result = HealthChecker::new(&target, &command, &SystemRunner).check();
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_check_launch_failure_is_unhealthy() {
        let target = ResolvedTarget::Kubelet;
        let command = CommandLine::new(["/nonexistent/curl"]);
        let result = HealthChecker::new(&target, &command, &SystemRunner).check();
        assert_eq!(result.status, HealthStatus::Unhealthy);
        assert_eq!(result.output.status, ExitState::LaunchFailed);
    }

    #[test]
    fn test_summary() {
        let result = CheckResult {
            status: HealthStatus::Unhealthy,
            output: CommandOutput {
                status: ExitState::Exited(124),
                output: "timed out\nmore\n".to_string(),
                duration: Duration::from_millis(1500),
            },
        };
        assert_eq!(result.summary(), "unhealthy (exit 124, 1500ms) - timed out");
    }
}
