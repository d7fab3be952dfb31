//! Cache profiles.
//!
//! A profile is a complete set of cache templates for every core kind. Two profiles
//! are provided:
//! 1. **Baseline:** Large, highly associative L1s and a 1 MiB L2 for the minor core; the
//!    HPI core keeps its own tuned caches.
//! 2. **Prefetch/Writeback:** Narrower L1s with write buffers, stride prefetchers on the
//!    L1D and a 512 KiB L2, shared by the minor and HPI cores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CacheSpec, PrefetcherSpec};
use crate::common::error::ParseNameError;
use crate::common::units::{ByteSize, Frequency};
use crate::cpu::CoreKind;

/// Named set of cache templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheProfile {
    /// Baseline caches without prefetching on the minor core.
    #[default]
    Baseline,
    /// Stride-prefetching caches with write buffers at every level.
    PrefetchWriteback,
}

/// Cache templates for one core kind. All absent for atomic cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheTemplates {
    /// Private L1 instruction cache.
    pub l1i: Option<CacheSpec>,
    /// Private L1 data cache.
    pub l1d: Option<CacheSpec>,
    /// Cluster-shared L2 cache.
    pub l2: Option<CacheSpec>,
}

impl CacheProfile {
    /// Every profile, in declaration order.
    pub const ALL: [Self; 2] = [Self::Baseline, Self::PrefetchWriteback];

    /// Profile name as used in configuration and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::PrefetchWriteback => "prefetch-writeback",
        }
    }

    /// Cluster clock used when none is given on the command line.
    pub const fn default_cpu_freq(self) -> Frequency {
        match self {
            Self::Baseline => Frequency::from_ghz(4),
            Self::PrefetchWriteback => Frequency::from_mhz(1500),
        }
    }

    /// Returns the cache templates this profile assigns to `kind`.
    pub fn templates(self, kind: CoreKind) -> CacheTemplates {
        match (self, kind) {
            (_, CoreKind::Atomic) => CacheTemplates::default(),
            (Self::Baseline, CoreKind::Minor) => CacheTemplates {
                l1i: Some(baseline::l1()),
                l1d: Some(baseline::l1()),
                l2: Some(baseline::l2()),
            },
            (Self::Baseline, CoreKind::Hpi) => CacheTemplates {
                l1i: Some(hpi::icache()),
                l1d: Some(hpi::dcache()),
                l2: Some(hpi::l2()),
            },
            (Self::PrefetchWriteback, CoreKind::Minor | CoreKind::Hpi) => CacheTemplates {
                l1i: Some(prefetch_writeback::l1i()),
                l1d: Some(prefetch_writeback::l1d()),
                l2: Some(prefetch_writeback::l2()),
            },
        }
    }
}

impl fmt::Display for CacheProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CacheProfile {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("cache profile", s))
    }
}

mod baseline {
    use super::{ByteSize, CacheSpec};

    pub fn l1() -> CacheSpec {
        CacheSpec::default()
    }

    pub fn l2() -> CacheSpec {
        CacheSpec {
            size: ByteSize::from_mib(1),
            associativity: 16,
            mshrs: 4,
            targets_per_mshr: 12,
            write_buffers: Some(8),
            ..CacheSpec::default()
        }
        .with_latency(20)
    }
}

/// Caches tuned for the HPI core.
mod hpi {
    use super::{ByteSize, CacheSpec, PrefetcherSpec};

    pub fn icache() -> CacheSpec {
        CacheSpec {
            associativity: 2,
            mshrs: 2,
            targets_per_mshr: 8,
            ..CacheSpec::default()
        }
        .with_latency(1)
    }

    pub fn dcache() -> CacheSpec {
        CacheSpec {
            associativity: 4,
            mshrs: 4,
            targets_per_mshr: 8,
            write_buffers: Some(4),
            prefetcher: Some(PrefetcherSpec::stride(4, 4)),
            ..CacheSpec::default()
        }
        .with_latency(1)
    }

    pub fn l2() -> CacheSpec {
        CacheSpec {
            size: ByteSize::from_mib(1),
            associativity: 16,
            tag_latency: 13,
            data_latency: 13,
            response_latency: 5,
            mshrs: 4,
            targets_per_mshr: 8,
            write_buffers: Some(16),
            prefetcher: None,
        }
    }
}

mod prefetch_writeback {
    use super::{ByteSize, CacheSpec, PrefetcherSpec};

    /// L1 base for this profile: the default L1, 2-way.
    fn l1() -> CacheSpec {
        CacheSpec {
            associativity: 2,
            ..CacheSpec::default()
        }
    }

    pub fn l1i() -> CacheSpec {
        CacheSpec {
            mshrs: 1,
            write_buffers: Some(1),
            ..l1()
        }
    }

    pub fn l1d() -> CacheSpec {
        CacheSpec {
            associativity: 4,
            mshrs: 3,
            write_buffers: Some(3),
            prefetcher: Some(PrefetcherSpec::stride(5, 5).on_access()),
            ..l1()
        }
    }

    pub fn l2() -> CacheSpec {
        CacheSpec {
            size: ByteSize::from_kib(512),
            associativity: 16,
            mshrs: 24,
            targets_per_mshr: 12,
            write_buffers: Some(8),
            prefetcher: Some(PrefetcherSpec::stride(8, 8).on_access()),
            ..CacheSpec::default()
        }
        .with_latency(12)
    }
}
