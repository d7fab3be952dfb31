//! Cluster topology CLI.
//!
//! This binary builds a system plan and hands it to the dry-run backend. It performs:
//! 1. **Configuration:** Flags (`--cpu`, `--num-cores`, ...) or a JSON file (`--config`).
//! 2. **Workloads:** Positional command lines, split shell-style, one per core.
//! 3. **Output:** Optional JSON dump of the plan (`--dump`), then the simulation banner.
//!
//! Any configuration error is printed to stderr and exits with status 1 before
//! simulation begins.

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::{env, fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clustertopo_core::cache::CacheProfile;
use clustertopo_core::common::{ByteSize, Frequency, Voltage};
use clustertopo_core::config::{ClusterConfig, Config, SystemConfig};
use clustertopo_core::sim::{DryRunBackend, SimulationBackend, Workload};
use clustertopo_core::soc::MemoryType;

#[derive(Parser, Debug)]
#[command(
    name = "clustertopo",
    author,
    version,
    about = "Build a CPU cluster topology and run it on a simulator backend",
    long_about = "Resolve a CPU model into a validated cluster topology, bind one workload per core, and hand the plan to a backend.\n\nExamples:\n  clustertopo --cpu minor --num-cores 2 'bin/qsort 1000' 'bin/fft'\n  clustertopo --cpu hpi --profile prefetch-writeback --dump plan.json bin/qsort\n  clustertopo --config system.json bin/a bin/b"
)]
struct Cli {
    /// Command(s) to be run on the cores, one per core.
    #[arg(value_name = "COMMAND")]
    commands: Vec<String>,

    /// CPU model to be used (atomic, minor, hpi, or one registered by --config).
    #[arg(long, default_value = "minor")]
    cpu: String,

    /// Cluster clock frequency [default: 4GHz, or 1.5GHz with the prefetch-writeback profile].
    #[arg(long)]
    cpu_freq: Option<Frequency>,

    /// Cluster voltage.
    #[arg(long, default_value = "1.2V")]
    cpu_voltage: Voltage,

    /// Number of CPU cores.
    #[arg(long, default_value_t = 1)]
    num_cores: usize,

    /// Type of memory to use.
    #[arg(long, default_value = "DDR3_1600_8x8")]
    mem_type: MemoryType,

    /// Physical memory size.
    #[arg(long, default_value = "2GB")]
    mem_size: ByteSize,

    /// Cache profile for the built-in core models.
    #[arg(long, default_value = "baseline")]
    profile: CacheProfile,

    /// JSON configuration; replaces every system and cluster flag above.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["cpu", "cpu_freq", "cpu_voltage", "num_cores", "mem_type", "mem_size", "profile"]
    )]
    config: Option<PathBuf>,

    /// Write the system plan as JSON to this file.
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,
}

impl Cli {
    /// Assembles the configuration from `--config` or from the individual flags.
    fn config(&self) -> Result<Config, Box<dyn Error>> {
        if let Some(path) = &self.config {
            return Ok(Config::load(path)?);
        }

        Ok(Config {
            profile: self.profile,
            system: SystemConfig {
                mem_type: self.mem_type,
                mem_size: self.mem_size,
                ..SystemConfig::default()
            },
            clusters: vec![ClusterConfig {
                cpu: self.cpu.clone(),
                num_cores: self.num_cores,
                cpu_freq: self.cpu_freq.unwrap_or_else(|| self.profile.default_cpu_freq()),
                cpu_voltage: self.cpu_voltage,
            }],
            core_models: BTreeMap::new(),
        })
    }

    /// Splits each positional command shell-style into an argument vector.
    fn argvs(&self) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
        self.commands
            .iter()
            .enumerate()
            .map(|(index, command)| {
                shlex::split(command).ok_or_else(|| {
                    Box::<dyn Error>::from(format!("command #{index} has unbalanced quoting: {command}"))
                })
            })
            .collect()
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config()?;
    let workloads = Workload::from_commands(&env::current_dir()?, cli.argvs()?)?;
    let plan = config.build_plan(workloads)?;

    if let Some(path) = &cli.dump {
        fs::write(path, plan.to_json()?)?;
        tracing::info!(path = %path.display(), "Wrote system plan");
    }

    let mut backend = DryRunBackend::new();
    backend.instantiate(&plan)?;

    println!("Beginning simulation..");
    let exit = backend.simulate()?;
    tracing::info!(tick = exit.tick, cause = %exit.cause, "Simulation exited");
    println!("Exiting simulation");

    Ok(())
}
