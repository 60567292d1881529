//! Qomp Demo Suite
//!
//! Small programs that drive the simulators end to end:
//!
//! - **demo-circuits**: Bell and GHZ states measured in several bases on
//!   either backend
//! - **demo-teleport**: teleportation with classically controlled
//!   corrections, checked against the density operator
//! - **demo-channel**: amplitude damping and dephasing on a mixed state
//!
//! Every binary reads the same simulator options (see [`SimArgs`]) and logs
//! through `tracing`; set `RUST_LOG=debug` to follow the runners.

pub mod circuits;

use std::path::PathBuf;

use clap::Args;
use console::style;
use qomp::SimConfig;
use tracing_subscriber::EnvFilter;

/// Simulator options shared by the demo binaries.
///
/// Command-line values win over the environment, which wins over the
/// optional YAML file.
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend name (state_vector, stabilizer)
    #[arg(long, short)]
    pub backend: Option<String>,

    /// Number of shots
    #[arg(long, short)]
    pub shots: Option<u32>,

    /// Seed for the runner's random source
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SimArgs {
    /// Resolve the simulator configuration.
    pub fn to_config(&self) -> anyhow::Result<SimConfig> {
        let mut config = SimConfig::load(self.config.as_deref())?;
        if let Some(backend) = &self.backend {
            config.backend = backend.clone();
        }
        if let Some(shots) = self.shots {
            config.default_shots = shots;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the log subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print the banner of a demo program.
pub fn print_header(title: &str) {
    let banner = format!(" qomp · {title} ");
    println!();
    println!("{}", style(&banner).black().on_cyan().bold());
    println!();
}

/// Print a section heading.
pub fn print_section(title: &str) {
    println!();
    println!("{} {}", style("::").cyan().bold(), style(title).bold());
}

/// Print a labelled value, labels aligned in one column.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("   {:<24}{value}", style(label).dim());
}

/// Print the closing line of a demo.
pub fn print_success(message: &str) {
    println!();
    println!("{} {message}", style("ok").green().bold());
}

/// Print a warning.
pub fn print_warning(message: &str) {
    println!("{} {message}", style("warn").yellow().bold());
}

/// Print the counts of a run, most frequent first.
pub fn print_counts(result: &qomp::MeasurementResult) {
    let mut counts: Vec<_> = result
        .frequency_map()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (bits, n) in counts {
        let share = n as f64 / result.shots() as f64;
        println!(
            "    |{bits}⟩  {n:>6}  {}",
            style("█".repeat((share * 30.0).round() as usize)).blue()
        );
    }
}
