//! Memory hierarchy wiring.
//!
//! A [`WiringPlan`] describes which ports of a cluster are connected to which. Every
//! cluster takes exactly one of three shapes:
//! 1. **Direct:** Atomic cores with no caches; both core ports go to the memory bus.
//! 2. **Private L1:** Each core owns an L1I/L1D pair whose memory sides go to the memory bus.
//! 3. **Shared L2:** Each core owns an L1I/L1D pair; all L1 memory sides go to a cluster
//!    crossbar in front of one shared L2, and only the L2 reaches the memory bus.
//!
//! Plans are pure values derived from a [`ClusterSpec`]; wiring the same cluster twice
//! yields equal plans.

use std::fmt;

use serde::Serialize;

use super::builder::ClusterSpec;
use crate::cache::CacheSpec;
use crate::common::error::{Result, TopologyError};
use crate::common::units::Frequency;
use crate::cpu::MemoryMode;

/// Width of the cluster L2 crossbar, in bytes.
pub const L2_BUS_WIDTH_BYTES: u32 = 64;

/// Private caches of one core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreCaches {
    /// Id of the owning core.
    pub core_id: usize,
    /// L1 instruction cache instance.
    pub l1i: CacheSpec,
    /// L1 data cache instance.
    pub l1d: CacheSpec,
}

/// Crossbar between the L1 caches of a cluster and its shared L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct L2Bus {
    /// Data path width in bytes.
    pub width_bytes: u32,
    /// Clock of the crossbar (the cluster clock).
    pub clock: Frequency,
}

/// The outward attachment of a cluster to the memory bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Attachment {
    /// Each core's instruction and data ports.
    CorePorts,
    /// Each core's L1 memory-side ports.
    L1Ports,
    /// The cluster L2's memory-side port.
    L2Port,
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CorePorts => "each core's direct port",
            Self::L1Ports => "each core's L1 outward port",
            Self::L2Port => "cluster L2 outward port",
        })
    }
}

/// A connectable port. Cluster-level ports are local to their cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Port {
    /// Instruction fetch port of a core.
    CoreIcache(usize),
    /// Data port of a core.
    CoreDcache(usize),
    /// Core-facing side of a core's L1 instruction cache.
    L1iCpuSide(usize),
    /// Memory-facing side of a core's L1 instruction cache.
    L1iMemSide(usize),
    /// Core-facing side of a core's L1 data cache.
    L1dCpuSide(usize),
    /// Memory-facing side of a core's L1 data cache.
    L1dMemSide(usize),
    /// Responder side of the cluster L2 crossbar.
    L2BusCpuSide,
    /// Requester side of the cluster L2 crossbar.
    L2BusMemSide,
    /// Core-facing side of the shared L2.
    L2CpuSide,
    /// Memory-facing side of the shared L2.
    L2MemSide,
    /// The system-wide memory bus.
    MemBus,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoreIcache(id) => write!(f, "cpu{id}.icache_port"),
            Self::CoreDcache(id) => write!(f, "cpu{id}.dcache_port"),
            Self::L1iCpuSide(id) => write!(f, "cpu{id}.l1i.cpu_side"),
            Self::L1iMemSide(id) => write!(f, "cpu{id}.l1i.mem_side"),
            Self::L1dCpuSide(id) => write!(f, "cpu{id}.l1d.cpu_side"),
            Self::L1dMemSide(id) => write!(f, "cpu{id}.l1d.mem_side"),
            Self::L2BusCpuSide => f.write_str("toL2Bus.cpu_side_ports"),
            Self::L2BusMemSide => f.write_str("toL2Bus.mem_side_ports"),
            Self::L2CpuSide => f.write_str("l2.cpu_side"),
            Self::L2MemSide => f.write_str("l2.mem_side"),
            Self::MemBus => f.write_str("membus.cpu_side_ports"),
        }
    }
}

/// A directed connection from a requester port to a responder port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Connection {
    /// Requesting side.
    pub from: Port,
    /// Responding side.
    pub to: Port,
}

impl Connection {
    const fn new(from: Port, to: Port) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Port-level wiring of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum WiringPlan {
    /// Cacheless cores wired straight to the memory bus.
    Direct {
        /// Core ids, in order.
        cores: Vec<usize>,
    },
    /// Private L1 pairs wired to the memory bus.
    PrivateL1 {
        /// Per-core caches, in core id order.
        cores: Vec<CoreCaches>,
    },
    /// Private L1 pairs behind one shared L2.
    SharedL2 {
        /// Per-core caches, in core id order.
        cores: Vec<CoreCaches>,
        /// Crossbar in front of the L2.
        l2_bus: L2Bus,
        /// The shared L2 instance.
        l2: CacheSpec,
    },
}

impl WiringPlan {
    /// Which ports reach the memory bus.
    pub const fn shape(&self) -> Attachment {
        match self {
            Self::Direct { .. } => Attachment::CorePorts,
            Self::PrivateL1 { .. } => Attachment::L1Ports,
            Self::SharedL2 { .. } => Attachment::L2Port,
        }
    }

    /// Returns `true` for the direct shape.
    pub const fn is_cacheless(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }

    /// Ids of the wired cores, in order.
    pub fn core_ids(&self) -> Vec<usize> {
        match self {
            Self::Direct { cores } => cores.clone(),
            Self::PrivateL1 { cores } | Self::SharedL2 { cores, .. } => {
                cores.iter().map(|core| core.core_id).collect()
            }
        }
    }

    /// Per-core private caches; empty for the direct shape.
    pub fn core_caches(&self) -> &[CoreCaches] {
        match self {
            Self::Direct { .. } => &[],
            Self::PrivateL1 { cores } | Self::SharedL2 { cores, .. } => cores,
        }
    }

    /// The shared L2 instance, if any.
    pub const fn l2(&self) -> Option<&CacheSpec> {
        match self {
            Self::SharedL2 { l2, .. } => Some(l2),
            Self::Direct { .. } | Self::PrivateL1 { .. } => None,
        }
    }

    /// Number of cache instances the plan creates.
    pub fn cache_count(&self) -> usize {
        let private = self.core_caches().len() * 2;
        private + usize::from(self.l2().is_some())
    }

    /// Every connection of the plan, cores first, in core id order.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        match self {
            Self::Direct { cores } => {
                for &id in cores {
                    out.push(Connection::new(Port::CoreIcache(id), Port::MemBus));
                    out.push(Connection::new(Port::CoreDcache(id), Port::MemBus));
                }
            }
            Self::PrivateL1 { cores } => {
                for core in cores {
                    push_l1_pair(&mut out, core.core_id, Port::MemBus);
                }
            }
            Self::SharedL2 { cores, .. } => {
                for core in cores {
                    push_l1_pair(&mut out, core.core_id, Port::L2BusCpuSide);
                }
                out.push(Connection::new(Port::L2BusMemSide, Port::L2CpuSide));
                out.push(Connection::new(Port::L2MemSide, Port::MemBus));
            }
        }
        out
    }

    /// Ports of this cluster that connect to the memory bus.
    pub fn system_ports(&self) -> Vec<Port> {
        self.connections()
            .into_iter()
            .filter(|conn| conn.to == Port::MemBus)
            .map(|conn| conn.from)
            .collect()
    }
}

fn push_l1_pair(out: &mut Vec<Connection>, id: usize, outward: Port) {
    out.push(Connection::new(Port::CoreIcache(id), Port::L1iCpuSide(id)));
    out.push(Connection::new(Port::CoreDcache(id), Port::L1dCpuSide(id)));
    out.push(Connection::new(Port::L1iMemSide(id), outward));
    out.push(Connection::new(Port::L1dMemSide(id), outward));
}

/// Derives the wiring plan of a cluster.
///
/// Atomic clusters are wired directly. Timing clusters get one private L1I/L1D pair per
/// core, cloned from the model's templates, and attach through the shared L2 when the
/// model has one.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidTopology`] if the core model violates the memory-mode
/// cache invariant, including a timing model without both L1 caches.
pub fn wire_memory_hierarchy(cluster: &ClusterSpec) -> Result<WiringPlan> {
    let model = cluster.core_model();
    model.validate()?;

    let plan = match model.memory_mode {
        MemoryMode::Atomic => WiringPlan::Direct {
            cores: cluster.core_ids().collect(),
        },
        MemoryMode::Timing => {
            let (Some(l1i), Some(l1d)) = (model.l1_instruction_cache, model.l1_data_cache) else {
                return Err(TopologyError::invalid(format!(
                    "core model `{}`: timing memory mode requires both L1 caches",
                    model.identifier
                )));
            };
            let cores = cluster
                .core_ids()
                .map(|core_id| CoreCaches { core_id, l1i, l1d })
                .collect();

            match model.l2_cache {
                Some(l2) => WiringPlan::SharedL2 {
                    cores,
                    l2_bus: L2Bus {
                        width_bytes: L2_BUS_WIDTH_BYTES,
                        clock: cluster.clock_frequency(),
                    },
                    l2,
                },
                None => WiringPlan::PrivateL1 { cores },
            }
        }
    };

    tracing::debug!(
        socket = cluster.socket_id(),
        model = %model.identifier,
        shape = %plan.shape(),
        caches = plan.cache_count(),
        "Wired cluster memory hierarchy"
    );

    Ok(plan)
}
