//! Main memory description.
//!
//! This module provides:
//! 1. **Memory Types:** The memory controller/device models a simulator can attach.
//! 2. **Address Ranges:** The physical range served by main memory.
//!
//! Controllers are attached by the simulator, not modeled here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::{ParseNameError, Result, TopologyError};
use crate::common::units::ByteSize;

/// Memory controller models available for main memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum MemoryType {
    /// DDR3-1600, 8 devices of x8.
    #[default]
    #[serde(rename = "DDR3_1600_8x8")]
    Ddr3_1600_8x8,
    /// DDR3-2133, 8 devices of x8.
    #[serde(rename = "DDR3_2133_8x8")]
    Ddr3_2133_8x8,
    /// DDR4-2400, 8 devices of x8.
    #[serde(rename = "DDR4_2400_8x8")]
    Ddr4_2400_8x8,
    /// LPDDR2-S4-1066, single x32 channel.
    #[serde(rename = "LPDDR2_S4_1066_1x32")]
    Lpddr2S4_1066_1x32,
    /// LPDDR3-1600, single x32 channel.
    #[serde(rename = "LPDDR3_1600_1x32")]
    Lpddr3_1600_1x32,
    /// HBM gen1, 1000 MHz, 4-high stack, x128.
    #[serde(rename = "HBM_1000_4H_1x128")]
    Hbm1000,
    /// Fixed-latency memory without DRAM timing.
    #[serde(rename = "SimpleMemory")]
    Simple,
}

impl MemoryType {
    /// Every memory type, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Ddr3_1600_8x8,
        Self::Ddr3_2133_8x8,
        Self::Ddr4_2400_8x8,
        Self::Lpddr2S4_1066_1x32,
        Self::Lpddr3_1600_1x32,
        Self::Hbm1000,
        Self::Simple,
    ];

    /// Simulator class name of this memory model.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ddr3_1600_8x8 => "DDR3_1600_8x8",
            Self::Ddr3_2133_8x8 => "DDR3_2133_8x8",
            Self::Ddr4_2400_8x8 => "DDR4_2400_8x8",
            Self::Lpddr2S4_1066_1x32 => "LPDDR2_S4_1066_1x32",
            Self::Lpddr3_1600_1x32 => "LPDDR3_1600_1x32",
            Self::Hbm1000 => "HBM_1000_4H_1x128",
            Self::Simple => "SimpleMemory",
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MemoryType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("memory type", s))
    }
}

/// Half-open physical address range `[start, start + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddrRange {
    /// First address of the range.
    pub start: u64,
    /// Length of the range.
    pub size: ByteSize,
}

impl AddrRange {
    /// Creates a range starting at `start`.
    pub const fn new(start: u64, size: ByteSize) -> Self {
        Self { start, size }
    }

    /// One past the last address, or `None` if the range overflows the address space.
    pub const fn end(&self) -> Option<u64> {
        self.start.checked_add(self.size.as_bytes())
    }

    /// Returns `true` if `addr` falls inside the range.
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && self.end().is_none_or(|end| addr < end)
    }
}

/// Main memory: controller model plus the single range it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemorySpec {
    /// Controller model.
    pub kind: MemoryType,
    /// Served address range.
    pub range: AddrRange,
}

impl MemorySpec {
    /// Creates main memory of `size` starting at address 0.
    pub const fn new(kind: MemoryType, size: ByteSize) -> Self {
        Self {
            kind,
            range: AddrRange::new(0, size),
        }
    }

    /// Checks that the memory is non-empty and fits the address space.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] for an empty or overflowing range.
    pub fn validate(&self) -> Result<()> {
        if self.range.size.is_zero() {
            return Err(TopologyError::invalid("memory size must be positive"));
        }
        if self.range.end().is_none() {
            return Err(TopologyError::invalid(format!(
                "memory range starting at {:#x} overflows the address space",
                self.range.start
            )));
        }
        Ok(())
    }
}
