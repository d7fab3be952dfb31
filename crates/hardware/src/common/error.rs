//! Topology error definitions.
//!
//! Every failure in this crate is a startup-time configuration problem: nothing is
//! retried or silently recovered. It provides:
//! 1. **Topology Errors:** Unknown core models, structural violations, and workload mismatches.
//! 2. **Name Parsing:** A small error for enum-like names (memory types, profiles, core kinds).

use thiserror::Error;

/// Errors raised while resolving core models, building clusters, or binding workloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The requested core-model identifier is not registered.
    #[error("unknown core model `{identifier}`")]
    UnknownCoreModel {
        /// Identifier that failed to resolve.
        identifier: String,
    },

    /// A structural rule of the topology was violated.
    ///
    /// Covers zero core counts, timing mode without mandatory L1 caches, atomic mode
    /// with caches, invalid cache parameters, duplicate sockets, and mixed memory modes.
    #[error("invalid topology: {detail}")]
    InvalidTopology {
        /// Description of the violated rule.
        detail: String,
    },

    /// The number of workloads differs from the number of allocated cores.
    #[error("number of cores ({cores}) doesn't match number of workloads ({workloads})")]
    WorkloadCountMismatch {
        /// Total cores in the finalized topology.
        cores: usize,
        /// Workloads supplied by the caller.
        workloads: usize,
    },

    /// A workload descriptor is unusable (e.g. an empty command line).
    #[error("invalid workload #{index}: {detail}")]
    InvalidWorkload {
        /// Position of the workload in the supplied list.
        index: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A core model with this identifier is already registered.
    #[error("core model `{identifier}` is already registered")]
    DuplicateCoreModel {
        /// Identifier that was registered twice.
        identifier: String,
    },
}

impl TopologyError {
    /// Shorthand for [`TopologyError::InvalidTopology`].
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidTopology {
            detail: detail.into(),
        }
    }
}

/// Result alias for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Error for names that do not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseNameError {
    /// What was being parsed (e.g. "memory type").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseNameError {
    /// Creates a new name error.
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
