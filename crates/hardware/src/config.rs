//! Configuration for topology construction.
//!
//! This module defines the configuration record a system is built from. It provides:
//! 1. **Defaults:** Baseline constants (system clock, memory, a single minor core at 4GHz).
//! 2. **Structures:** System settings, the cluster list, and extra core models.
//! 3. **Pipeline:** [`Config::build_plan`] runs registry → clusters → finalize → bind.
//!
//! Configuration is supplied as JSON (`--config`) or assembled from command-line flags on
//! top of `Config::default()`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheProfile;
use crate::common::error::TopologyError;
use crate::common::units::{ByteSize, Frequency, Voltage};
use crate::cpu::{CoreModelRegistry, CustomCoreModel};
use crate::sim::{SystemPlan, Workload};
use crate::soc::{ClockDomain, MemorySpec, MemoryType};
use crate::topology::{FinalizedTopology, SystemTopology};

/// Default configuration constants.
mod defaults {
    use crate::common::units::{ByteSize, Frequency, Voltage};

    /// System (memory bus) clock.
    pub const SYSTEM_CLOCK: Frequency = Frequency::from_ghz(1);

    /// System voltage domain (3.3V).
    pub const SYSTEM_VOLTAGE: Voltage = Voltage::from_millivolts(3300);

    /// Main memory size (2 GiB).
    pub const MEM_SIZE: ByteSize = ByteSize::from_gib(2);

    /// Core model of the default cluster.
    pub const CPU: &str = "minor";

    /// Cores in the default cluster.
    pub const NUM_CORES: usize = 1;

    /// Cluster clock.
    pub const CPU_FREQ: Frequency = Frequency::from_ghz(4);

    /// Cluster voltage domain (1.2V).
    pub const CPU_VOLTAGE: Voltage = Voltage::from_millivolts(1200);
}

/// Errors raised while loading or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The described system is invalid.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use clustertopo_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.clusters.len(), 1);
/// assert_eq!(config.clusters[0].cpu, "minor");
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use clustertopo_core::cache::CacheProfile;
/// use clustertopo_core::config::Config;
///
/// let json = r#"{
///     "profile": "prefetch-writeback",
///     "system": { "mem_type": "DDR4_2400_8x8", "mem_size": "512MB" },
///     "clusters": [
///         { "cpu": "hpi", "num_cores": 2, "cpu_freq": "1.5GHz", "cpu_voltage": "900mV" }
///     ]
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.profile, CacheProfile::PrefetchWriteback);
/// assert_eq!(config.system.mem_size.to_string(), "512MB");
/// assert_eq!(config.clusters[0].num_cores, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Cache profile the built-in core models are taken from.
    #[serde(default)]
    pub profile: CacheProfile,

    /// System clock and main memory.
    #[serde(default)]
    pub system: SystemConfig,

    /// Clusters, in construction order.
    #[serde(default = "Config::default_clusters")]
    pub clusters: Vec<ClusterConfig>,

    /// Extra core models, keyed by identifier.
    #[serde(default)]
    pub core_models: BTreeMap<String, CustomCoreModel>,
}

impl Config {
    fn default_clusters() -> Vec<ClusterConfig> {
        vec![ClusterConfig::default()]
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, unknown fields, or bad unit strings
    /// (unit errors arrive wrapped in the JSON error).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::from_json_str(&json)
    }

    /// Builds the core-model registry: the profile's built-ins plus `core_models`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateCoreModel`] if a custom model shadows a registered
    /// identifier, or [`TopologyError::InvalidTopology`] if it is malformed.
    pub fn registry(&self) -> Result<CoreModelRegistry, TopologyError> {
        let mut registry = CoreModelRegistry::builtin(self.profile);
        for (identifier, custom) in &self.core_models {
            registry.register_custom(identifier, custom).inspect_err(|err| {
                tracing::warn!(identifier, %err, "Rejected core model");
            })?;
        }
        Ok(registry)
    }

    /// Adds every configured cluster and finalizes the topology.
    ///
    /// # Errors
    ///
    /// Returns the first [`TopologyError`] from registration, cluster construction, or
    /// finalization.
    pub fn build_topology(&self) -> Result<FinalizedTopology, TopologyError> {
        let mut topology = SystemTopology::new(self.registry()?);
        for cluster in &self.clusters {
            let _ = topology.add_cluster(&cluster.cpu, cluster.num_cores, cluster.cpu_freq, cluster.cpu_voltage)?;
        }
        topology.finalize()
    }

    /// Runs the full pipeline and binds `workloads` to the resulting cores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Topology`] wrapping the first failure, including
    /// [`TopologyError::WorkloadCountMismatch`].
    pub fn build_plan(&self, workloads: Vec<Workload>) -> Result<SystemPlan, ConfigError> {
        let topology = self.build_topology()?;
        let plan = SystemPlan::new(
            self.system.clock_domain(),
            MemorySpec::new(self.system.mem_type, self.system.mem_size),
            topology,
            workloads,
        )?;
        Ok(plan)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: CacheProfile::default(),
            system: SystemConfig::default(),
            clusters: Self::default_clusters(),
            core_models: BTreeMap::new(),
        }
    }
}

/// System-wide settings outside the CPU clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Memory bus clock.
    #[serde(default = "SystemConfig::default_clock")]
    pub clock: Frequency,

    /// System voltage domain.
    #[serde(default = "SystemConfig::default_voltage")]
    pub voltage: Voltage,

    /// Main memory controller model.
    #[serde(default)]
    pub mem_type: MemoryType,

    /// Main memory size.
    #[serde(default = "SystemConfig::default_mem_size")]
    pub mem_size: ByteSize,
}

impl SystemConfig {
    const fn default_clock() -> Frequency {
        defaults::SYSTEM_CLOCK
    }

    const fn default_voltage() -> Voltage {
        defaults::SYSTEM_VOLTAGE
    }

    const fn default_mem_size() -> ByteSize {
        defaults::MEM_SIZE
    }

    /// The system clock domain.
    pub const fn clock_domain(&self) -> ClockDomain {
        ClockDomain::new(self.clock, self.voltage)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            clock: defaults::SYSTEM_CLOCK,
            voltage: defaults::SYSTEM_VOLTAGE,
            mem_type: MemoryType::default(),
            mem_size: defaults::MEM_SIZE,
        }
    }
}

/// One cluster to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Core model identifier.
    #[serde(default = "ClusterConfig::default_cpu")]
    pub cpu: String,

    /// Number of cores.
    #[serde(default = "ClusterConfig::default_num_cores")]
    pub num_cores: usize,

    /// Cluster clock.
    #[serde(default = "ClusterConfig::default_cpu_freq")]
    pub cpu_freq: Frequency,

    /// Cluster voltage.
    #[serde(default = "ClusterConfig::default_cpu_voltage")]
    pub cpu_voltage: Voltage,
}

impl ClusterConfig {
    fn default_cpu() -> String {
        defaults::CPU.to_owned()
    }

    const fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }

    const fn default_cpu_freq() -> Frequency {
        defaults::CPU_FREQ
    }

    const fn default_cpu_voltage() -> Voltage {
        defaults::CPU_VOLTAGE
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cpu: Self::default_cpu(),
            num_cores: defaults::NUM_CORES,
            cpu_freq: defaults::CPU_FREQ,
            cpu_voltage: defaults::CPU_VOLTAGE,
        }
    }
}
