//! System-level components.
//!
//! This module describes the parts of the simulated system that sit outside the CPU
//! clusters: clock/voltage domains and main memory (type and address range).

/// Clock and voltage domains.
pub mod clock;

/// Main memory type and address range.
pub mod memory;

pub use clock::ClockDomain;
pub use memory::{AddrRange, MemorySpec, MemoryType};
