//! Health monitoring and recovery for node components
//!
//! Provides:
//! - A single health check of the resolved target
//! - Best-effort debug and remedy actions when the check fails
//! - A cool-down before reporting failure to the supervisor

pub mod checker;
pub mod recovery;

pub use checker::{CheckResult, HealthChecker, HealthStatus};
pub use recovery::{Recovery, RecoveryConfig, RecoveryReport};

use crate::exec::CommandRunner;
use crate::node::ResolvedTarget;
use crate::probe::CommandSet;

/// Outcome of one check-and-react cycle
#[derive(Debug, Clone)]
pub struct MonitorReport {
    pub check: CheckResult,
    /// Present only when the check was unhealthy
    pub recovery: Option<RecoveryReport>,
}

impl MonitorReport {
    pub fn status(&self) -> HealthStatus {
        self.check.status
    }
}

/// Runs one check-and-react cycle for a resolved target
pub struct HealthMonitor<'a, R: CommandRunner> {
    target: &'a ResolvedTarget,
    commands: &'a CommandSet,
    recovery: RecoveryConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> HealthMonitor<'a, R> {
    pub fn new(
        target: &'a ResolvedTarget,
        commands: &'a CommandSet,
        recovery: RecoveryConfig,
        runner: &'a R,
    ) -> Self {
        Self {
            target,
            commands,
            recovery,
            runner,
        }
    }

    /// Check the target once, reacting if it is unhealthy
    pub fn check_health(&self) -> MonitorReport {
        let check = HealthChecker::new(self.target, &self.commands.health_check, self.runner).check();

        if check.status == HealthStatus::Healthy {
            return MonitorReport {
                check,
                recovery: None,
            };
        }

        println!("{} is unhealthy! {}", self.target, check.output.output);
        let report = Recovery::new(self.target, self.commands, &self.recovery, self.runner).run();

        MonitorReport {
            check,
            recovery: Some(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedRunner;
    use crate::probe;
    use crate::settings::NodeLayout;
    use super::recovery::ActionOutcome;

    fn commands_for(target: &ResolvedTarget) -> CommandSet {
        probe::select(target, 60, &NodeLayout::default())
    }

    fn all_enabled() -> RecoveryConfig {
        RecoveryConfig {
            enable_debug: true,
            enable_remedy: true,
            cooldown: 0,
        }
    }

    #[test]
    fn test_healthy_takes_no_action() {
        let target = ResolvedTarget::ContainerRuntime("docker".to_string());
        let commands = commands_for(&target);
        let runner = ScriptedRunner::new();

        let report = HealthMonitor::new(&target, &commands, all_enabled(), &runner).check_health();

        assert_eq!(report.status(), HealthStatus::Healthy);
        assert_eq!(report.status().exit_code(), 0);
        assert!(report.recovery.is_none());
        assert_eq!(runner.calls(), vec![commands.health_check.clone()]);
    }

    #[test]
    fn test_unhealthy_runs_debug_then_remedy_once() {
        let target = ResolvedTarget::ContainerRuntime("docker".to_string());
        let commands = commands_for(&target);
        let runner = ScriptedRunner::new().failing(&commands.health_check);

        let report = HealthMonitor::new(&target, &commands, all_enabled(), &runner).check_health();

        assert_eq!(report.status().exit_code(), 1);
        assert_eq!(
            runner.calls(),
            vec![
                commands.health_check.clone(),
                commands.debug.clone(),
                commands.remedy.clone()
            ]
        );
    }

    #[test]
    fn test_unhealthy_without_reactions() {
        let target = ResolvedTarget::Kubelet;
        let commands = commands_for(&target);
        let runner = ScriptedRunner::new().failing(&commands.health_check);

        let report =
            HealthMonitor::new(&target, &commands, RecoveryConfig::default(), &runner).check_health();

        assert_eq!(report.status(), HealthStatus::Unhealthy);
        assert_eq!(runner.calls(), vec![commands.health_check.clone()]);
        let recovery = report.recovery.unwrap();
        assert!(matches!(recovery.debug, ActionOutcome::Disabled));
        assert!(matches!(recovery.remedy, ActionOutcome::Disabled));
    }

    #[test]
    fn test_kubelet_has_no_debug_action() {
        let target = ResolvedTarget::Kubelet;
        let commands = commands_for(&target);
        let runner = ScriptedRunner::new().failing(&commands.health_check);

        let report = HealthMonitor::new(&target, &commands, all_enabled(), &runner).check_health();

        let recovery = report.recovery.unwrap();
        assert!(matches!(recovery.debug, ActionOutcome::Unavailable));
        assert_eq!(runner.count(&commands.remedy), 1);
    }

    #[test]
    fn test_failing_reactions_keep_unhealthy_status() {
        let target = ResolvedTarget::ContainerRuntime("docker".to_string());
        let commands = commands_for(&target);
        let runner = ScriptedRunner::new()
            .failing(&commands.health_check)
            .failing(&commands.debug)
            .failing(&commands.remedy);

        let report = HealthMonitor::new(&target, &commands, all_enabled(), &runner).check_health();

        assert_eq!(report.status().exit_code(), 1);
        let recovery = report.recovery.unwrap();
        assert!(matches!(recovery.debug, ActionOutcome::Failed(_)));
        assert!(matches!(recovery.remedy, ActionOutcome::Failed(_)));
    }
}
