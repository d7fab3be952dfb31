//! Common types used throughout the topology library.
//!
//! This module provides the building blocks shared by every other module:
//! 1. **Error Handling:** The `TopologyError` enum and the crate `Result` alias.
//! 2. **Units:** Strong types for frequencies, voltages, and byte sizes with simulator-style
//!    textual forms (`"4GHz"`, `"1.2V"`, `"32kB"`).

/// Error types for topology construction and name parsing.
pub mod error;

/// Physical unit types (frequency, voltage, byte size).
pub mod units;

pub use error::{ParseNameError, Result, TopologyError};
pub use units::{ByteSize, Frequency, UnitParseError, Voltage};
