//! Simulation backends.
//!
//! A backend owns everything past the topology: object instantiation and the run loop.
//! The trait is the only seam; real simulators implement it outside this crate.

use thiserror::Error;

use super::plan::SystemPlan;

/// Errors reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// `simulate` was called before `instantiate`.
    #[error("no system has been instantiated")]
    NotInstantiated,
    /// `instantiate` was called twice.
    #[error("a system has already been instantiated")]
    AlreadyInstantiated,
    /// The backend rejected the plan or failed while running.
    #[error("backend failure: {0}")]
    Failed(String),
}

/// Why and when a simulation stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitEvent {
    /// Human-readable exit cause.
    pub cause: String,
    /// Simulated tick at which the run stopped.
    pub tick: u64,
}

/// A simulator able to instantiate and run a [`SystemPlan`].
pub trait SimulationBackend {
    /// Creates the simulated objects described by `plan`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the plan cannot be instantiated.
    fn instantiate(&mut self, plan: &SystemPlan) -> Result<(), BackendError>;

    /// Runs the instantiated system until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotInstantiated`] if called before `instantiate`.
    fn simulate(&mut self) -> Result<ExitEvent, BackendError>;
}

/// Backend that records the plan and exits immediately without simulating.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    plan: Option<SystemPlan>,
}

impl DryRunBackend {
    /// Creates an empty backend.
    pub const fn new() -> Self {
        Self { plan: None }
    }

    /// The instantiated plan, if any.
    pub const fn plan(&self) -> Option<&SystemPlan> {
        self.plan.as_ref()
    }
}

impl SimulationBackend for DryRunBackend {
    fn instantiate(&mut self, plan: &SystemPlan) -> Result<(), BackendError> {
        if self.plan.is_some() {
            return Err(BackendError::AlreadyInstantiated);
        }

        for cluster in plan.topology().clusters() {
            let spec = cluster.spec();
            tracing::info!(
                socket = spec.socket_id(),
                class = spec.core_model().kind.simulator_class(),
                cores = spec.core_count(),
                clock = %spec.clock_domain(),
                attach = %cluster.wiring().shape(),
                "Instantiating cluster"
            );
            for conn in cluster.wiring().connections() {
                tracing::debug!("Connecting {conn}");
            }
        }

        self.plan = Some(plan.clone());
        Ok(())
    }

    fn simulate(&mut self) -> Result<ExitEvent, BackendError> {
        let plan = self.plan.as_ref().ok_or(BackendError::NotInstantiated)?;
        tracing::info!(cores = plan.topology().total_cores(), "Dry run complete");
        Ok(ExitEvent {
            cause: "dry run: no simulation performed".to_owned(),
            tick: 0,
        })
    }
}
