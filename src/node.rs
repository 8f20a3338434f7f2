//! Component resolution against node-local configuration
//!
//! Maps the requested component onto the concrete subsystem that is
//! actually in effect on this node. For the container runtime this means
//! reading the runtime name out of `<kube-home>/kube-env`.

use crate::error::{Error, Result};
use clap::ValueEnum;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Runtime assumed when `kube-env` does not name one
pub const DEFAULT_RUNTIME: &str = "docker";

/// Substring identifying the runtime-name key in `kube-env`
pub const RUNTIME_NAME_KEY: &str = "CONTAINER_RUNTIME_NAME";

/// Name of the node configuration file under the node configuration root
pub const KUBE_ENV_FILE: &str = "kube-env";

/// Component the monitor can be asked to watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    /// The node agent managing workloads on this host
    Kubelet,
    /// Whatever container runtime the node is configured with
    ContainerRuntime,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Kubelet => write!(f, "kubelet"),
            Component::ContainerRuntime => write!(f, "container-runtime"),
        }
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kubelet" => Ok(Component::Kubelet),
            "container-runtime" => Ok(Component::ContainerRuntime),
            other => Err(Error::UnsupportedComponent(other.to_string())),
        }
    }
}

/// Concrete subsystem the probes are built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// The kubelet itself
    Kubelet,
    /// A named container runtime (e.g. `docker`, `containerd`)
    ContainerRuntime(String),
}

impl ResolvedTarget {
    /// Name used in commands and diagnostics
    pub fn name(&self) -> &str {
        match self {
            ResolvedTarget::Kubelet => "kubelet",
            ResolvedTarget::ContainerRuntime(name) => name,
        }
    }

    /// Whether this is the default runtime, which is probed through its own CLI
    pub fn is_default_runtime(&self) -> bool {
        matches!(self, ResolvedTarget::ContainerRuntime(name) if name == DEFAULT_RUNTIME)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolve a component to the concrete target in effect on this node
pub fn resolve(component: Component, kube_env: &Path) -> Result<ResolvedTarget> {
    let target = match component {
        Component::Kubelet => ResolvedTarget::Kubelet,
        Component::ContainerRuntime => {
            ResolvedTarget::ContainerRuntime(container_runtime_name(kube_env)?)
        }
    };
    tracing::debug!(%component, resolved = %target, "resolved monitoring target");
    Ok(target)
}

/// Read the configured container runtime name from a `kube-env` file
///
/// A missing file is fatal. A file without a runtime-name key falls back to
/// [`DEFAULT_RUNTIME`].
pub fn container_runtime_name(kube_env: &Path) -> Result<String> {
    let content = match fs::read(kube_env) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::KubeEnvMissing(kube_env.to_path_buf()));
        }
        Err(e) => {
            return Err(Error::KubeEnvRead {
                path: kube_env.to_path_buf(),
                source: e,
            });
        }
    };

    Ok(runtime_name_from(&content).unwrap_or_else(|| {
        tracing::debug!(
            path = %kube_env.display(),
            "no runtime name configured, assuming {}",
            DEFAULT_RUNTIME
        );
        DEFAULT_RUNTIME.to_string()
    }))
}

/// Find the runtime name in `kube-env` content
///
/// Lines are split on the first `=`. The first line whose key contains
/// [`RUNTIME_NAME_KEY`] anywhere wins, even if later lines match too.
/// An empty value counts as not configured. Inner whitespace is kept, so
/// the name always reaches the remedy command as a single unit name.
pub fn runtime_name_from(content: &str) -> Option<String> {
    let value = content.lines().find_map(|line| {
        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        key.contains(RUNTIME_NAME_KEY).then_some(value)
    })?;

    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
