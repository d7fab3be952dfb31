//! Workloads and core bindings.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::common::error::{Result, TopologyError};
use crate::topology::FinalizedTopology;

/// Process id given to the first workload; later workloads count up from here.
pub const FIRST_PID: u32 = 100;

/// A user-space process to run on one core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    /// Process id.
    pub pid: u32,
    /// Working directory of the process.
    pub cwd: PathBuf,
    /// Argument vector; `argv[0]` is the executable.
    pub argv: Vec<String>,
}

impl Workload {
    /// Creates a workload.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidWorkload`] if `argv` is empty or its first element is
    /// blank.
    pub fn new(index: usize, cwd: impl Into<PathBuf>, argv: Vec<String>) -> Result<Self> {
        if argv.first().is_none_or(|exe| exe.trim().is_empty()) {
            return Err(TopologyError::InvalidWorkload {
                index,
                detail: "command line names no executable".to_owned(),
            });
        }
        let pid = u32::try_from(index)
            .ok()
            .and_then(|i| FIRST_PID.checked_add(i))
            .ok_or_else(|| TopologyError::InvalidWorkload {
                index,
                detail: "process id out of range".to_owned(),
            })?;

        Ok(Self {
            pid,
            cwd: cwd.into(),
            argv,
        })
    }

    /// Builds one workload per argument vector, assigning pids in order.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidWorkload`] for the first empty argument vector.
    pub fn from_commands<I>(cwd: &Path, commands: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        commands
            .into_iter()
            .enumerate()
            .map(|(index, argv)| Self::new(index, cwd, argv))
            .collect()
    }

    /// Path of the executable (`argv[0]`).
    pub fn executable(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }
}

/// One workload pinned to one core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreBinding {
    /// Core running the workload.
    pub core_id: usize,
    /// The workload.
    pub workload: Workload,
}

/// Pairs every core of `topology` with one workload, in core id order.
///
/// # Errors
///
/// Returns [`TopologyError::WorkloadCountMismatch`] unless there is exactly one workload
/// per core.
pub fn bind_workloads(topology: &FinalizedTopology, workloads: Vec<Workload>) -> Result<Vec<CoreBinding>> {
    let cores = topology.total_cores();
    if workloads.len() != cores {
        tracing::warn!(cores, workloads = workloads.len(), "Workload count mismatch");
        return Err(TopologyError::WorkloadCountMismatch {
            cores,
            workloads: workloads.len(),
        });
    }

    let bindings: Vec<CoreBinding> = topology
        .core_ids()
        .zip(workloads)
        .map(|(core_id, workload)| CoreBinding { core_id, workload })
        .collect();

    for binding in &bindings {
        tracing::debug!(
            core = binding.core_id,
            pid = binding.workload.pid,
            exe = binding.workload.executable(),
            "Bound workload"
        );
    }
    tracing::info!(count = bindings.len(), "Bound workloads");

    Ok(bindings)
}
