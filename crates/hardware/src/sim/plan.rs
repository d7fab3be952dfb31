//! The complete system plan.
//!
//! A [`SystemPlan`] is what a simulator backend instantiates: the finalized cluster
//! topology, the system clock domain driving the memory bus, one main memory serving
//! `[0, size)`, the system memory mode, and the workload bound to each core.

use serde::Serialize;

use super::workload::{CoreBinding, Workload, bind_workloads};
use crate::common::error::Result;
use crate::cpu::MemoryMode;
use crate::soc::{ClockDomain, MemorySpec};
use crate::topology::FinalizedTopology;

/// Everything needed to instantiate a simulated system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemPlan {
    system_clock: ClockDomain,
    memory: MemorySpec,
    memory_mode: MemoryMode,
    topology: FinalizedTopology,
    bindings: Vec<CoreBinding>,
}

impl SystemPlan {
    /// Validates the system-level parts and binds `workloads` to the topology's cores.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::InvalidTopology`](crate::TopologyError::InvalidTopology) for a
    ///   zero system clock or voltage, or an empty memory.
    /// - [`TopologyError::WorkloadCountMismatch`](crate::TopologyError::WorkloadCountMismatch)
    ///   unless there is one workload per core.
    pub fn new(
        system_clock: ClockDomain,
        memory: MemorySpec,
        topology: FinalizedTopology,
        workloads: Vec<Workload>,
    ) -> Result<Self> {
        system_clock.validate("system")?;
        memory.validate()?;
        let bindings = bind_workloads(&topology, workloads)?;

        tracing::info!(
            clock = %system_clock,
            memory = %memory.kind,
            size = %memory.range.size,
            cores = topology.total_cores(),
            "System plan ready"
        );

        Ok(Self {
            system_clock,
            memory,
            memory_mode: topology.memory_mode(),
            topology,
            bindings,
        })
    }

    /// Clock domain of the system (memory bus).
    pub const fn system_clock(&self) -> ClockDomain {
        self.system_clock
    }

    /// Main memory.
    pub const fn memory(&self) -> &MemorySpec {
        &self.memory
    }

    /// Memory mode of the whole system.
    pub const fn memory_mode(&self) -> MemoryMode {
        self.memory_mode
    }

    /// The cluster topology.
    pub const fn topology(&self) -> &FinalizedTopology {
        &self.topology
    }

    /// Workload of every core, in core id order.
    pub fn bindings(&self) -> &[CoreBinding] {
        &self.bindings
    }

    /// Serializes the plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if a value fails to serialize.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
