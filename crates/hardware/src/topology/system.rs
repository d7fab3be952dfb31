//! System topology aggregate.
//!
//! [`SystemTopology`] owns the ordered clusters of a system and the running core and
//! cluster counters. Clusters are appended through [`SystemTopology::add_cluster`], which
//! either fully succeeds or leaves the topology untouched. Once every cluster is added,
//! [`SystemTopology::finalize`] freezes id assignment into a [`FinalizedTopology`].

use serde::Serialize;

use super::builder::{ClusterSpec, TopologyBuilder};
use super::wiring::WiringPlan;
use crate::common::error::{Result, TopologyError};
use crate::common::units::{Frequency, Voltage};
use crate::cpu::{CoreModelRegistry, MemoryMode};

/// Index of a cluster within the topology that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClusterHandle(usize);

impl ClusterHandle {
    /// Position of the cluster in construction order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A cluster together with its wiring plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    spec: ClusterSpec,
    wiring: WiringPlan,
}

impl Cluster {
    /// Immutable cluster description.
    pub const fn spec(&self) -> &ClusterSpec {
        &self.spec
    }

    /// Port wiring of the cluster.
    pub const fn wiring(&self) -> &WiringPlan {
        &self.wiring
    }
}

/// Incrementally built system topology.
#[derive(Debug, Clone, Default)]
pub struct SystemTopology {
    builder: TopologyBuilder,
    clusters: Vec<Cluster>,
    num_cores: usize,
}

impl SystemTopology {
    /// Creates an empty topology resolving models against `registry`.
    pub const fn new(registry: CoreModelRegistry) -> Self {
        Self {
            builder: TopologyBuilder::new(registry),
            clusters: Vec::new(),
            num_cores: 0,
        }
    }

    /// The builder used for resolution.
    pub const fn builder(&self) -> &TopologyBuilder {
        &self.builder
    }

    /// Resolves, builds, and wires a cluster, then appends it.
    ///
    /// The cluster's cores take the next `core_count` ids and its socket id is the
    /// number of clusters already present. On error nothing changes.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::UnknownCoreModel`] if `identifier` is not registered.
    /// - [`TopologyError::InvalidTopology`] for a zero core count, an invalid clock domain,
    ///   a wiring failure, a memory mode differing from the existing clusters, or a
    ///   duplicate socket id.
    pub fn add_cluster(
        &mut self,
        identifier: &str,
        core_count: usize,
        clock_frequency: Frequency,
        voltage: Voltage,
    ) -> Result<ClusterHandle> {
        let model = self.builder.resolve_core_model(identifier)?;
        let spec = TopologyBuilder::build_cluster(
            model,
            core_count,
            clock_frequency,
            voltage,
            self.num_cores,
            self.clusters.len(),
        )?;
        let wiring = TopologyBuilder::wire_memory_hierarchy(&spec)?;

        if let Some(mode) = self.memory_mode()
            && mode != spec.memory_mode()
        {
            return Err(TopologyError::invalid(format!(
                "cluster `{identifier}` uses {} memory mode but the system is {mode}",
                spec.memory_mode()
            )));
        }

        if self.clusters.iter().any(|c| c.spec.socket_id() == spec.socket_id()) {
            return Err(TopologyError::invalid(format!(
                "socket id {} is already assigned",
                spec.socket_id()
            )));
        }

        let next_total = self.num_cores + spec.core_count();
        tracing::info!(
            model = identifier,
            cores = spec.core_count(),
            socket = spec.socket_id(),
            clock = %spec.clock_domain(),
            first_core = spec.first_core_id(),
            "Added cluster"
        );

        let handle = ClusterHandle(self.clusters.len());
        self.clusters.push(Cluster { spec, wiring });
        self.num_cores = next_total;

        Ok(handle)
    }

    /// Total cores across all clusters.
    pub const fn total_cores(&self) -> usize {
        self.num_cores
    }

    /// Number of clusters added.
    pub const fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Looks up a cluster by handle.
    pub fn cluster(&self, handle: ClusterHandle) -> Option<&Cluster> {
        self.clusters.get(handle.0)
    }

    /// Clusters in construction order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Memory mode shared by the clusters, or `None` while empty.
    pub fn memory_mode(&self) -> Option<MemoryMode> {
        self.clusters.first().map(|c| c.spec.memory_mode())
    }

    /// Freezes the topology.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if no cluster was added.
    pub fn finalize(self) -> Result<FinalizedTopology> {
        let Some(memory_mode) = self.memory_mode() else {
            return Err(TopologyError::invalid("topology has no clusters"));
        };

        tracing::info!(
            clusters = self.clusters.len(),
            cores = self.num_cores,
            mode = %memory_mode,
            "Finalized topology"
        );

        Ok(FinalizedTopology {
            clusters: self.clusters,
            num_cores: self.num_cores,
            memory_mode,
        })
    }
}

/// A topology whose core and socket ids can no longer change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedTopology {
    clusters: Vec<Cluster>,
    num_cores: usize,
    memory_mode: MemoryMode,
}

impl FinalizedTopology {
    /// Clusters in construction order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Total cores across all clusters.
    pub const fn total_cores(&self) -> usize {
        self.num_cores
    }

    /// Number of clusters.
    pub const fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// System memory mode.
    pub const fn memory_mode(&self) -> MemoryMode {
        self.memory_mode
    }

    /// Every core id, in ascending order.
    pub fn core_ids(&self) -> impl Iterator<Item = usize> {
        self.clusters.iter().flat_map(|c| c.spec.core_ids())
    }
}
