//! Topology builder.
//!
//! The builder resolves core models and constructs cluster specs. None of its
//! operations mutate shared state: the caller passes in the running core and cluster
//! counts and is responsible for advancing them once a cluster is accepted.

use std::ops::Range;

use serde::Serialize;

use super::wiring::{self, WiringPlan};
use crate::common::error::{Result, TopologyError};
use crate::common::units::{Frequency, Voltage};
use crate::cpu::{CoreModelRegistry, CoreModelSpec, MemoryMode};
use crate::soc::ClockDomain;

/// An immutable CPU cluster: `core_count` identical cores sharing a clock domain.
///
/// Core ids are the contiguous range starting at [`ClusterSpec::first_core_id`]; every
/// core in the cluster reports [`ClusterSpec::socket_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSpec {
    core_model: CoreModelSpec,
    core_count: usize,
    clock_domain: ClockDomain,
    socket_id: usize,
    first_core_id: usize,
}

impl ClusterSpec {
    /// Core model shared by every core of the cluster.
    pub const fn core_model(&self) -> &CoreModelSpec {
        &self.core_model
    }

    /// Number of cores.
    pub const fn core_count(&self) -> usize {
        self.core_count
    }

    /// Cluster clock and voltage domain.
    pub const fn clock_domain(&self) -> ClockDomain {
        self.clock_domain
    }

    /// Cluster clock frequency.
    pub const fn clock_frequency(&self) -> Frequency {
        self.clock_domain.frequency
    }

    /// Cluster supply voltage.
    pub const fn voltage(&self) -> Voltage {
        self.clock_domain.voltage
    }

    /// Socket id assigned to every core of this cluster.
    pub const fn socket_id(&self) -> usize {
        self.socket_id
    }

    /// Id of the first core.
    pub const fn first_core_id(&self) -> usize {
        self.first_core_id
    }

    /// Ids of all cores, in order.
    pub const fn core_ids(&self) -> Range<usize> {
        self.first_core_id..self.first_core_id + self.core_count
    }

    /// Memory mode of the cluster's cores.
    pub const fn memory_mode(&self) -> MemoryMode {
        self.core_model.memory_mode
    }
}

/// Resolves core models and builds clusters against a registry.
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    registry: CoreModelRegistry,
}

impl TopologyBuilder {
    /// Creates a builder over `registry`.
    pub const fn new(registry: CoreModelRegistry) -> Self {
        Self { registry }
    }

    /// Registry used for resolution.
    pub const fn registry(&self) -> &CoreModelRegistry {
        &self.registry
    }

    /// Looks up a core model by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownCoreModel`] if the identifier is not registered.
    pub fn resolve_core_model(&self, identifier: &str) -> Result<CoreModelSpec> {
        self.registry.resolve(identifier)
    }

    /// Constructs a cluster spec without touching any external state.
    ///
    /// Core ids are allocated as `[existing_core_count, existing_core_count + core_count)` and
    /// the socket id is `existing_cluster_count`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if `core_count` is zero, the clock domain has
    /// a zero frequency or voltage, or the core id range would overflow.
    pub fn build_cluster(
        core_model: CoreModelSpec,
        core_count: usize,
        clock_frequency: Frequency,
        voltage: Voltage,
        existing_core_count: usize,
        existing_cluster_count: usize,
    ) -> Result<ClusterSpec> {
        if core_count == 0 {
            return Err(TopologyError::invalid(format!(
                "cluster of `{}` cores must have at least one core",
                core_model.identifier
            )));
        }

        let clock_domain = ClockDomain::new(clock_frequency, voltage);
        clock_domain.validate(&format!("cluster {existing_cluster_count}"))?;

        if existing_core_count.checked_add(core_count).is_none() {
            return Err(TopologyError::invalid("core id space exhausted"));
        }

        Ok(ClusterSpec {
            core_model,
            core_count,
            clock_domain,
            socket_id: existing_cluster_count,
            first_core_id: existing_core_count,
        })
    }

    /// See [`wiring::wire_memory_hierarchy`].
    ///
    /// # Errors
    ///
    /// Same as [`wiring::wire_memory_hierarchy`].
    pub fn wire_memory_hierarchy(cluster: &ClusterSpec) -> Result<WiringPlan> {
        wiring::wire_memory_hierarchy(cluster)
    }
}
