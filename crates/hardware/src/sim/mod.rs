//! Simulator boundary.
//!
//! Everything a simulator needs besides the topology itself:
//! 1. **Workloads:** Processes built from command lines and bound one-to-one to cores.
//! 2. **System Plan:** The finalized topology plus system clock, main memory, and bindings.
//! 3. **Backends:** The trait a simulator implements to instantiate and run a plan.

/// Simulation backends.
pub mod backend;

/// The complete system plan.
pub mod plan;

/// Workloads and core bindings.
pub mod workload;

pub use backend::{BackendError, DryRunBackend, ExitEvent, SimulationBackend};
pub use plan::SystemPlan;
pub use workload::{CoreBinding, FIRST_PID, Workload, bind_workloads};
