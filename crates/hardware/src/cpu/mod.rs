//! Core models.
//!
//! This module maps CPU-model names to everything needed to build a cluster of them:
//! 1. **Core Kinds:** The closed set of core implementations a simulator provides.
//! 2. **Memory Modes:** Whether a core runs functionally (atomic) or with full timing.
//! 3. **Core Model Specs:** A core kind paired with its L1/L2 cache templates.
//! 4. **Registry:** Identifier lookup, with extra models registrable from configuration.

/// Core-model registry.
pub mod registry;

pub use self::registry::{CoreModelRegistry, CustomCoreModel};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheSpec, CacheTemplates};
use crate::common::error::{ParseNameError, Result, TopologyError};

/// Core implementations understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreKind {
    /// Functional core; executes each access atomically, no caches.
    Atomic,
    /// In-order four-stage pipeline.
    Minor,
    /// High-performance in-order core (minor pipeline with tuned parameters).
    Hpi,
}

impl CoreKind {
    /// Every core kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Atomic, Self::Minor, Self::Hpi];

    /// Identifier under which this kind is registered by default.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Minor => "minor",
            Self::Hpi => "hpi",
        }
    }

    /// Simulator object class instantiated for each core of this kind.
    pub const fn simulator_class(self) -> &'static str {
        match self {
            Self::Atomic => "AtomicSimpleCPU",
            Self::Minor => "MinorCPU",
            Self::Hpi => "HPI",
        }
    }

    /// Memory mode this kind requires from the whole system.
    pub const fn memory_mode(self) -> MemoryMode {
        match self {
            Self::Atomic => MemoryMode::Atomic,
            Self::Minor | Self::Hpi => MemoryMode::Timing,
        }
    }
}

impl fmt::Display for CoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoreKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("core kind", s))
    }
}

/// System memory access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryMode {
    /// Functional accesses; timing models (and therefore caches) are bypassed.
    Atomic,
    /// Timed accesses through the full cache hierarchy.
    Timing,
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atomic => "atomic",
            Self::Timing => "timing",
        })
    }
}

/// A resolved core model: core kind, cache templates, and memory mode.
///
/// Invariant (checked by [`CoreModelSpec::validate`]): atomic models carry no caches;
/// timing models carry both L1 caches, and the L2 is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreModelSpec {
    /// Identifier this model was registered under.
    pub identifier: String,
    /// Core implementation.
    pub kind: CoreKind,
    /// Private L1 instruction cache template.
    pub l1_instruction_cache: Option<CacheSpec>,
    /// Private L1 data cache template.
    pub l1_data_cache: Option<CacheSpec>,
    /// Cluster-shared L2 template.
    pub l2_cache: Option<CacheSpec>,
    /// Memory mode of the core kind.
    pub memory_mode: MemoryMode,
}

impl CoreModelSpec {
    /// Builds a model from a core kind and a set of cache templates.
    pub fn from_templates(identifier: impl Into<String>, kind: CoreKind, templates: CacheTemplates) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            l1_instruction_cache: templates.l1i,
            l1_data_cache: templates.l1d,
            l2_cache: templates.l2,
            memory_mode: kind.memory_mode(),
        }
    }

    /// Returns `true` if any cache level is present.
    pub const fn has_caches(&self) -> bool {
        self.l1_instruction_cache.is_some() || self.l1_data_cache.is_some() || self.l2_cache.is_some()
    }

    /// Checks the memory-mode/cache-presence invariant and every cache's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let id = &self.identifier;

        if self.memory_mode != self.kind.memory_mode() {
            return Err(TopologyError::invalid(format!(
                "core model `{id}`: {} cores require {} memory mode, not {}",
                self.kind,
                self.kind.memory_mode(),
                self.memory_mode
            )));
        }

        match self.memory_mode {
            MemoryMode::Atomic if self.has_caches() => {
                return Err(TopologyError::invalid(format!(
                    "core model `{id}`: atomic memory mode cannot have caches"
                )));
            }
            MemoryMode::Timing if self.l1_instruction_cache.is_none() || self.l1_data_cache.is_none() => {
                return Err(TopologyError::invalid(format!(
                    "core model `{id}`: timing memory mode requires both L1 caches"
                )));
            }
            MemoryMode::Atomic | MemoryMode::Timing => {}
        }

        let levels = [
            ("l1i", &self.l1_instruction_cache),
            ("l1d", &self.l1_data_cache),
            ("l2", &self.l2_cache),
        ];
        for (level, cache) in levels {
            if let Some(cache) = cache {
                cache.validate(&format!("core model `{id}` {level}"))?;
            }
        }

        Ok(())
    }
}
