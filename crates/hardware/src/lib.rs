//! CPU cluster topology library.
//!
//! This crate turns a CPU-model selection into a validated, immutable description of
//! the hardware a cycle-accurate simulator should instantiate:
//! 1. **Caches:** Typed cache parameter sets and the named profiles that supply them.
//! 2. **Core models:** A registry mapping model identifiers to core kinds and cache templates.
//! 3. **Topology:** Cluster construction, core/socket id allocation, and port wiring plans.
//! 4. **SoC:** Clock domains, memory type, and the system address range.
//! 5. **Simulation boundary:** Workload binding, the full system plan, and the backend seam.
//!
//! Nothing here simulates hardware; the output is a plain value handed to a simulator.

/// Cache parameter sets and profiles.
pub mod cache;
/// Shared types: errors and physical units.
pub mod common;
/// Configuration (defaults, JSON loading, plan construction).
pub mod config;
/// Core kinds, memory modes, and the core-model registry.
pub mod cpu;
/// Boundary with the simulator: workloads, plans, and backends.
pub mod sim;
/// System-level description (clock domains, main memory).
pub mod soc;
/// Cluster construction, wiring, and the system topology aggregate.
pub mod topology;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Error type shared by every topology operation.
pub use crate::common::error::{Result, TopologyError};
/// Aggregate that owns clusters and allocates core and socket ids.
pub use crate::topology::{FinalizedTopology, SystemTopology};
