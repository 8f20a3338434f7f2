//! health-monitor - node component health monitor
//!
//! Checks the kubelet or the container runtime once, optionally captures
//! diagnostics and applies a remedy when it is unhealthy, and reports the
//! result through the exit status. Scheduling repeated checks is left to
//! the supervisor that invokes it.

mod cli;
mod error;
mod exec;
mod node;
mod probe;
mod settings;
mod sickbay;

use cli::Cli;
use error::Result;
use exec::SystemRunner;
use probe::CommandLine;
use settings::Settings;
use sickbay::HealthMonitor;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Log to stderr, honouring `RUST_LOG` when set
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    if let Some(shell) = cli.generate_completion {
        Cli::generate_completion(shell);
        return Ok(0);
    }

    let settings = match &cli.config {
        Some(path) => settings::load(path)?,
        None => Settings::default(),
    };
    let (config, layout) = settings.merge_cli(&cli)?;

    let target = node::resolve(config.component, &layout.kube_env())?;
    let commands = probe::select(&target, config.timeout_seconds, &layout);

    if cli.dry_run {
        println!("Target:       {}", target);
        println!("Health check: {}", describe(&commands.health_check));
        println!("Debug:        {}", describe(&commands.debug));
        println!("Remedy:       {}", describe(&commands.remedy));
        return Ok(0);
    }

    let runner = SystemRunner;
    let report = HealthMonitor::new(&target, &commands, config.recovery(), &runner).check_health();

    if let Some(recovery) = &report.recovery {
        tracing::info!(
            resolved = %target,
            debug = %recovery.debug,
            remedy = %recovery.remedy,
            reacted = recovery.debug.attempted() || recovery.remedy.attempted(),
            cooled_down_secs = recovery.cooled_down.as_secs(),
            "reported unhealthy"
        );
    }

    Ok(report.status().exit_code())
}

fn describe(command: &CommandLine) -> String {
    if command.is_available() {
        command.to_string()
    } else {
        "<none>".to_string()
    }
}
