//! Probe selection
//!
//! Builds the health check, debug and remedy command lines for a resolved
//! target. Commands are token lists and are never handed to a shell.

use crate::node::ResolvedTarget;
use crate::settings::NodeLayout;
use std::fmt;

/// Process signalled by the docker debug action
const DOCKER_DAEMON: &str = "dockerd";

/// A command as an ordered list of argument tokens
///
/// An empty command line means the action is unavailable for the target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    /// Build a command line from tokens
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// The "no action" command line
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Whether there is anything to run
    pub fn is_available(&self) -> bool {
        !self.0.is_empty()
    }

    /// Executable to launch
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    /// Wrap in the `timeout` utility so the command is killed after `secs`
    pub fn with_timeout(self, secs: u64) -> Self {
        let mut tokens = vec!["timeout".to_string(), secs.to_string()];
        tokens.extend(self.0);
        Self(tokens)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Commands used for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// Always available for supported targets
    pub health_check: CommandLine,
    pub debug: CommandLine,
    pub remedy: CommandLine,
}

/// Build the command set for a target
pub fn select(target: &ResolvedTarget, timeout_secs: u64, layout: &NodeLayout) -> CommandSet {
    let commands = match target {
        ResolvedTarget::Kubelet => CommandSet {
            health_check: CommandLine::new([
                "curl".to_string(),
                "-m".to_string(),
                timeout_secs.to_string(),
                "-f".to_string(),
                "-s".to_string(),
                "-S".to_string(),
                layout.kubelet_healthz_url.clone(),
            ]),
            debug: CommandLine::unavailable(),
            remedy: CommandLine::new(["systemctl", "kill", "kubelet"]),
        },
        ResolvedTarget::ContainerRuntime(runtime) => {
            // Docker is probed directly rather than through crictl: the
            // dockershim lives in the kubelet, so crictl fails whenever the
            // kubelet is down even though docker itself is fine.
            let (health_check, debug) = if target.is_default_runtime() {
                (
                    CommandLine::new(["docker", "ps"]),
                    CommandLine::new(["pkill", "-SIGUSR1", DOCKER_DAEMON]),
                )
            } else {
                (
                    CommandLine::new([layout.crictl_path.display().to_string(), "pods".to_string()]),
                    CommandLine::unavailable(),
                )
            };

            CommandSet {
                health_check: health_check.with_timeout(timeout_secs),
                debug,
                remedy: CommandLine::new([
                    "systemctl".to_string(),
                    "kill".to_string(),
                    "--kill-who=main".to_string(),
                    runtime.clone(),
                ]),
            }
        }
    };

    tracing::debug!(
        resolved = %target,
        health_check = %commands.health_check,
        debug = %commands.debug,
        remedy = %commands.remedy,
        "selected probe commands"
    );
    commands
}
