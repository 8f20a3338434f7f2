//! Settings for a single monitor invocation
//!
//! Settings come from an optional TOML file and the command line, with
//! command line flags taking precedence. The merged result is an immutable
//! [`MonitorConfig`] plus the [`NodeLayout`] describing where things live on
//! this node.

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::node::{Component, KUBE_ENV_FILE};
use crate::sickbay::recovery::RecoveryConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default node configuration root
pub const DEFAULT_KUBE_HOME: &str = "/home/kubernetes";

/// Default kubelet health endpoint (read-only port)
pub const DEFAULT_KUBELET_HEALTHZ_URL: &str = "http://127.0.0.1:10255/healthz";

/// Load settings from a TOML file
pub fn load(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: Settings = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

/// Contents of a settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub probes: ProbeSection,
}

/// `[monitor]` section: same knobs as the command line flags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Component to monitor (`kubelet` or `container-runtime`)
    pub component: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub cool_down_seconds: Option<u64>,
    pub enable_debug: Option<bool>,
    pub enable_remedy: Option<bool>,
}

/// `[node]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    /// Node configuration root holding `kube-env` and `bin/crictl`
    pub kube_home: Option<PathBuf>,
}

/// `[probes]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    pub kubelet_healthz_url: Option<String>,
    /// Defaults to `<kube_home>/bin/crictl`
    pub crictl_path: Option<PathBuf>,
}

/// Immutable configuration for one check-and-react cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub component: Component,
    /// Upper bound on the health probe's run time
    pub timeout_seconds: u64,
    pub cool_down_seconds: u64,
    pub enable_debug: bool,
    pub enable_remedy: bool,
}

impl MonitorConfig {
    /// Reaction settings used after an unhealthy check
    pub fn recovery(&self) -> RecoveryConfig {
        RecoveryConfig {
            enable_debug: self.enable_debug,
            enable_remedy: self.enable_remedy,
            cooldown: self.cool_down_seconds,
        }
    }
}

/// Filesystem and endpoint layout of the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLayout {
    pub kube_home: PathBuf,
    pub kubelet_healthz_url: String,
    pub crictl_path: PathBuf,
}

impl NodeLayout {
    /// Layout rooted at `kube_home` with default probe locations
    pub fn new(kube_home: impl Into<PathBuf>) -> Self {
        let kube_home = kube_home.into();
        Self {
            crictl_path: kube_home.join("bin").join("crictl"),
            kubelet_healthz_url: DEFAULT_KUBELET_HEALTHZ_URL.to_string(),
            kube_home,
        }
    }

    /// Path of the node `kube-env` file
    pub fn kube_env(&self) -> PathBuf {
        self.kube_home.join(KUBE_ENV_FILE)
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self::new(DEFAULT_KUBE_HOME)
    }
}

impl Settings {
    /// Merge with command line flags into the final configuration
    pub fn merge_cli(self, cli: &Cli) -> Result<(MonitorConfig, NodeLayout)> {
        let component = match (cli.component, self.monitor.component.as_deref()) {
            (Some(component), _) => component,
            (None, Some(name)) => name.parse()?,
            (None, None) => {
                return Err(Error::ConfigValidation(
                    "component is required (--component or monitor.component)".into(),
                ));
            }
        };

        let timeout_seconds = cli
            .timeout_seconds
            .or(self.monitor.timeout_seconds)
            .ok_or_else(|| {
                Error::ConfigValidation(
                    "timeout is required (--timeout-seconds or monitor.timeout_seconds)".into(),
                )
            })?;
        if timeout_seconds == 0 {
            return Err(Error::ConfigValidation(
                "timeout_seconds must be a positive integer".into(),
            ));
        }

        let config = MonitorConfig {
            component,
            timeout_seconds,
            cool_down_seconds: cli
                .cool_down_seconds
                .or(self.monitor.cool_down_seconds)
                .unwrap_or(0),
            enable_debug: cli.enable_debug || self.monitor.enable_debug.unwrap_or(false),
            enable_remedy: cli.enable_remedy || self.monitor.enable_remedy.unwrap_or(false),
        };

        let kube_home = cli
            .kube_home
            .clone()
            .or(self.node.kube_home)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KUBE_HOME));
        let mut layout = NodeLayout::new(kube_home);
        if let Some(url) = self.probes.kubelet_healthz_url {
            layout.kubelet_healthz_url = url;
        }
        if let Some(crictl) = self.probes.crictl_path {
            layout.crictl_path = crictl;
        }

        Ok((config, layout))
    }
}
