//! Cluster topology construction.
//!
//! This module assembles CPU clusters into a system topology. It provides:
//! 1. **Builder:** Core-model resolution and side-effect-free cluster construction.
//! 2. **Wiring:** The port-level plan connecting cores, caches, and the memory bus.
//! 3. **System Topology:** The aggregate that allocates core and socket ids and
//!    freezes them once finalized.

/// Topology builder and cluster specs.
pub mod builder;

/// System topology aggregate.
pub mod system;

/// Memory hierarchy wiring plans.
pub mod wiring;

pub use builder::{ClusterSpec, TopologyBuilder};
pub use system::{Cluster, ClusterHandle, FinalizedTopology, SystemTopology};
pub use wiring::{Attachment, Connection, CoreCaches, L2Bus, Port, WiringPlan, wire_memory_hierarchy};
