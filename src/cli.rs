//! Command-line interface for the health monitor
//!
//! Uses clap with derive for type-safe CLI parsing

use crate::node::Component;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

/// Monitor component health
///
/// Runs one health check against the kubelet or the container runtime and
/// exits 0 when healthy, 1 when unhealthy and 2 on configuration errors.
#[derive(Parser, Debug)]
#[command(name = "health-monitor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the component to be monitored
    #[arg(long, value_enum, required_unless_present_any = ["config", "generate_completion"])]
    pub component: Option<Component>,

    /// Timeout seconds when running health check command
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..),
        required_unless_present_any = ["config", "generate_completion"]
    )]
    pub timeout_seconds: Option<u64>,

    /// Number of seconds to wait before exiting if the component is unhealthy
    #[arg(long, value_name = "SECONDS")]
    pub cool_down_seconds: Option<u64>,

    /// Perform debug actions when component is unhealthy
    #[arg(long)]
    pub enable_debug: bool,

    /// Perform remedy actions when component is unhealthy
    #[arg(long)]
    pub enable_remedy: bool,

    /// Node configuration root containing kube-env and bin/crictl
    #[arg(long, value_name = "DIR")]
    pub kube_home: Option<PathBuf>,

    /// Settings file (TOML); flags take precedence over its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub generate_completion: Option<Shell>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "health-monitor", &mut std::io::stdout());
    }
}
