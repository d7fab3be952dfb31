//! Clock and voltage domains.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::{Result, TopologyError};
use crate::common::units::{Frequency, Voltage};

/// A source clock driven by a voltage domain.
///
/// Each CPU cluster owns one; the system owns a separate one for the memory bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockDomain {
    /// Clock frequency.
    pub frequency: Frequency,
    /// Supply voltage of the domain.
    pub voltage: Voltage,
}

impl ClockDomain {
    /// Creates a clock domain.
    pub const fn new(frequency: Frequency, voltage: Voltage) -> Self {
        Self { frequency, voltage }
    }

    /// Checks that both frequency and voltage are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] naming `owner` for a zero frequency or voltage.
    pub fn validate(&self, owner: &str) -> Result<()> {
        if self.frequency.is_zero() {
            return Err(TopologyError::invalid(format!("{owner}: clock frequency must be positive")));
        }
        if self.voltage.is_zero() {
            return Err(TopologyError::invalid(format!("{owner}: voltage must be positive")));
        }
        Ok(())
    }
}

impl fmt::Display for ClockDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.frequency, self.voltage)
    }
}
