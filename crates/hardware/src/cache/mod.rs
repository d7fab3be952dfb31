//! Cache parameter sets.
//!
//! A [`CacheSpec`] describes one cache instance the simulator should build: capacity,
//! associativity, the three pipeline latencies, miss-handling resources, and an optional
//! hardware prefetcher. Nothing here models cache behaviour.
//!
//! Templates follow a base-defaults-plus-overrides pattern: [`CacheSpec::default`] is the
//! common L1 base, and every profile derives its caches from it with struct update syntax.
//! Configuration can apply a further layer of [`CacheOverrides`] on top of a template.

/// Named cache profiles and the per-core-kind templates they provide.
pub mod profiles;

pub use self::profiles::{CacheProfile, CacheTemplates};

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::error::{Result, TopologyError};
use crate::common::units::ByteSize;

/// Default cache constants (the L1 base shared by every profile).
mod defaults {
    use crate::common::units::ByteSize;

    /// Default cache capacity (32 KiB).
    pub const SIZE: ByteSize = ByteSize::from_kib(32);

    /// Default associativity (16 ways).
    pub const ASSOC: u32 = 16;

    /// Default tag, data, and response latency in cycles.
    pub const LATENCY: u32 = 2;

    /// Default number of MSHRs.
    pub const MSHRS: u32 = 4;

    /// Default targets per MSHR.
    pub const TGTS_PER_MSHR: u32 = 20;
}

/// Hardware prefetcher algorithms a cache can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PrefetcherKind {
    /// Stride prefetcher.
    ///
    /// Detects constant-stride access streams per PC and prefetches ahead of them.
    #[default]
    Stride,
    /// Tagged prefetcher.
    ///
    /// Prefetches on demand misses and on first hits to prefetched lines.
    Tagged,
}

/// Prefetcher attached to a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetcherSpec {
    /// Prefetch algorithm.
    #[serde(default)]
    pub kind: PrefetcherKind,
    /// Lines prefetched per trigger (at least 1).
    pub degree: u32,
    /// Prefetch queue depth (at least 1).
    pub queue_size: u32,
    /// Train on every access rather than only on misses.
    #[serde(default)]
    pub prefetch_on_access: bool,
}

impl PrefetcherSpec {
    /// Creates a stride prefetcher with the given degree and queue depth.
    pub const fn stride(degree: u32, queue_size: u32) -> Self {
        Self {
            kind: PrefetcherKind::Stride,
            degree,
            queue_size,
            prefetch_on_access: false,
        }
    }

    /// Returns this prefetcher with training on every access enabled.
    #[must_use]
    pub const fn on_access(mut self) -> Self {
        self.prefetch_on_access = true;
        self
    }
}

/// Parameters of a single cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSpec {
    /// Capacity.
    pub size: ByteSize,
    /// Number of ways.
    pub associativity: u32,
    /// Tag lookup latency in cycles.
    pub tag_latency: u32,
    /// Data array latency in cycles.
    pub data_latency: u32,
    /// Latency to forward a response upstream, in cycles.
    pub response_latency: u32,
    /// Miss-status holding registers (maximum outstanding misses).
    pub mshrs: u32,
    /// Requests that can be merged into one MSHR.
    pub targets_per_mshr: u32,
    /// Write buffer entries, when the level models them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_buffers: Option<u32>,
    /// Attached hardware prefetcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetcher: Option<PrefetcherSpec>,
}

impl Default for CacheSpec {
    /// The L1 base: 32 KiB, 16-way, 2-cycle latencies, 4 MSHRs with 20 targets each.
    fn default() -> Self {
        Self {
            size: defaults::SIZE,
            associativity: defaults::ASSOC,
            tag_latency: defaults::LATENCY,
            data_latency: defaults::LATENCY,
            response_latency: defaults::LATENCY,
            mshrs: defaults::MSHRS,
            targets_per_mshr: defaults::TGTS_PER_MSHR,
            write_buffers: None,
            prefetcher: None,
        }
    }
}

impl CacheSpec {
    /// Returns a copy with all three latencies set to `cycles`.
    #[must_use]
    pub const fn with_latency(mut self, cycles: u32) -> Self {
        self.tag_latency = cycles;
        self.data_latency = cycles;
        self.response_latency = cycles;
        self
    }

    /// Checks that every capacity and latency is strictly positive.
    ///
    /// `level` names the cache in the error message (e.g. `"l1d"`).
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] naming the first offending field.
    pub fn validate(&self, level: &str) -> Result<()> {
        let fields = [
            ("associativity", u64::from(self.associativity)),
            ("tag_latency", u64::from(self.tag_latency)),
            ("data_latency", u64::from(self.data_latency)),
            ("response_latency", u64::from(self.response_latency)),
            ("mshrs", u64::from(self.mshrs)),
            ("targets_per_mshr", u64::from(self.targets_per_mshr)),
        ];

        if self.size.is_zero() {
            return Err(TopologyError::invalid(format!("{level}: size must be positive")));
        }
        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(TopologyError::invalid(format!("{level}: {name} must be positive")));
        }
        if self.write_buffers == Some(0) {
            return Err(TopologyError::invalid(format!(
                "{level}: write_buffers must be positive when present"
            )));
        }
        if let Some(prefetcher) = &self.prefetcher {
            if prefetcher.degree == 0 {
                return Err(TopologyError::invalid(format!(
                    "{level}: prefetcher degree must be at least 1"
                )));
            }
            if prefetcher.queue_size == 0 {
                return Err(TopologyError::invalid(format!(
                    "{level}: prefetcher queue_size must be at least 1"
                )));
            }
        }

        Ok(())
    }
}

/// Field-by-field overrides applied on top of a cache template.
///
/// Absent fields keep the template's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheOverrides {
    /// Capacity override.
    #[serde(default)]
    pub size: Option<ByteSize>,
    /// Associativity override.
    #[serde(default)]
    pub associativity: Option<u32>,
    /// Tag latency override.
    #[serde(default)]
    pub tag_latency: Option<u32>,
    /// Data latency override.
    #[serde(default)]
    pub data_latency: Option<u32>,
    /// Response latency override.
    #[serde(default)]
    pub response_latency: Option<u32>,
    /// MSHR count override.
    #[serde(default)]
    pub mshrs: Option<u32>,
    /// Targets-per-MSHR override.
    #[serde(default)]
    pub targets_per_mshr: Option<u32>,
    /// Write buffer override.
    #[serde(default)]
    pub write_buffers: Option<u32>,
    /// Prefetcher to install (replaces the template's).
    #[serde(default)]
    pub prefetcher: Option<PrefetcherSpec>,
    /// Removes the template's prefetcher. Ignored when `prefetcher` is set.
    #[serde(default)]
    pub disable_prefetcher: bool,
}

impl CacheOverrides {
    /// Applies these overrides to `base`.
    pub fn apply(&self, base: CacheSpec) -> CacheSpec {
        let prefetcher = match (self.prefetcher, self.disable_prefetcher) {
            (Some(prefetcher), _) => Some(prefetcher),
            (None, true) => None,
            (None, false) => base.prefetcher,
        };

        CacheSpec {
            size: self.size.unwrap_or(base.size),
            associativity: self.associativity.unwrap_or(base.associativity),
            tag_latency: self.tag_latency.unwrap_or(base.tag_latency),
            data_latency: self.data_latency.unwrap_or(base.data_latency),
            response_latency: self.response_latency.unwrap_or(base.response_latency),
            mshrs: self.mshrs.unwrap_or(base.mshrs),
            targets_per_mshr: self.targets_per_mshr.unwrap_or(base.targets_per_mshr),
            write_buffers: self.write_buffers.or(base.write_buffers),
            prefetcher,
        }
    }
}

/// How a custom core model treats one cache level of its base template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLevelOverride {
    /// Keep the template unchanged.
    #[default]
    Inherit,
    /// Drop this cache level.
    Disabled,
    /// Keep the level, adjusting some of its fields.
    Override(CacheOverrides),
    /// Replace the level entirely (also adds a level the template lacks).
    Replace(CacheSpec),
}

impl CacheLevelOverride {
    /// Resolves this override against the template's level.
    ///
    /// `Override` on an absent level yields an absent level; use `Replace` to add one.
    pub fn resolve(&self, template: Option<CacheSpec>) -> Option<CacheSpec> {
        match self {
            Self::Inherit => template,
            Self::Disabled => None,
            Self::Override(overrides) => template.map(|base| overrides.apply(base)),
            Self::Replace(spec) => Some(*spec),
        }
    }

    /// Reads a level field where JSON `null` means [`CacheLevelOverride::Disabled`].
    ///
    /// Pair with `#[serde(default)]` so an omitted field still inherits.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error for anything other than `null` or a valid override.
    pub fn deserialize_nullable<'de, D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Self>::deserialize(deserializer)?.unwrap_or(Self::Disabled))
    }
}
