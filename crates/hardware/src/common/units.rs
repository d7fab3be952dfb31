//! Physical unit types.
//!
//! Simulator configuration traditionally passes clocks, voltages, and sizes as strings
//! (`"4GHz"`, `"1.2V"`, `"512kB"`). This module gives each of them a strong type:
//! 1. **Frequency:** Stored in hertz; parses `Hz`, `kHz`, `MHz`, `GHz`.
//! 2. **Voltage:** Stored in millivolts; parses `mV` and `V`.
//! 3. **Byte Size:** Stored in bytes; parses `B`, `kB`, `MB`, `GB`, `TB` (binary multiples).
//!
//! Parsing is exact: fractional inputs are accepted only when they resolve to a whole
//! number of the base unit (`"1.5GHz"` is fine, `"1.5Hz"` is not). All three types
//! serialize to and from their textual form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a unit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitParseError {
    /// The input was empty or whitespace.
    #[error("empty {quantity} value")]
    Empty {
        /// Quantity being parsed.
        quantity: &'static str,
    },

    /// The input has no leading number.
    #[error("`{input}` has no numeric part")]
    MissingNumber {
        /// Rejected input.
        input: String,
    },

    /// The unit suffix is not recognized for this quantity.
    #[error("`{input}` has an unknown {quantity} unit")]
    UnknownUnit {
        /// Rejected input.
        input: String,
        /// Quantity being parsed.
        quantity: &'static str,
    },

    /// The numeric part is malformed.
    #[error("`{input}` is not a valid number")]
    InvalidNumber {
        /// Rejected input.
        input: String,
    },

    /// The value is not a whole multiple of the base unit.
    #[error("`{input}` is not a whole number of {base}")]
    Inexact {
        /// Rejected input.
        input: String,
        /// Name of the base unit.
        base: &'static str,
    },

    /// The value does not fit in 64 bits of the base unit.
    #[error("`{input}` is out of range")]
    Overflow {
        /// Rejected input.
        input: String,
    },
}

/// Frequency suffixes (lowercase) and their multiplier in hertz.
const FREQUENCY_UNITS: &[(&str, u64)] = &[
    ("ghz", 1_000_000_000),
    ("mhz", 1_000_000),
    ("khz", 1_000),
    ("hz", 1),
];

/// Voltage suffixes (lowercase) and their multiplier in millivolts.
const VOLTAGE_UNITS: &[(&str, u64)] = &[("mv", 1), ("v", 1_000)];

/// Byte-size suffixes (lowercase) and their multiplier in bytes.
const BYTE_UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("b", 1),
    ("kb", 1 << 10),
    ("kib", 1 << 10),
    ("mb", 1 << 20),
    ("mib", 1 << 20),
    ("gb", 1 << 30),
    ("gib", 1 << 30),
    ("tb", 1 << 40),
    ("tib", 1 << 40),
];

/// Splits `"1.5GHz"` into `("1.5", "GHz")`.
fn split_number(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Parses a textual quantity into an exact count of its base unit.
fn parse_quantity(
    input: &str,
    quantity: &'static str,
    base: &'static str,
    units: &[(&str, u64)],
) -> Result<u64, UnitParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitParseError::Empty { quantity });
    }

    let (number, unit) = split_number(trimmed);
    if number.is_empty() {
        return Err(UnitParseError::MissingNumber {
            input: trimmed.to_owned(),
        });
    }

    let unit = unit.trim().to_ascii_lowercase();
    let scale = units
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|&(_, scale)| scale)
        .ok_or_else(|| UnitParseError::UnknownUnit {
            input: trimmed.to_owned(),
            quantity,
        })?;

    parse_scaled(trimmed, number, scale, base)
}

/// Multiplies a decimal string by `scale`, requiring an integral result.
fn parse_scaled(
    input: &str,
    number: &str,
    scale: u64,
    base: &'static str,
) -> Result<u64, UnitParseError> {
    let invalid = || UnitParseError::InvalidNumber {
        input: input.to_owned(),
    };
    let overflow = || UnitParseError::Overflow {
        input: input.to_owned(),
    };
    let inexact = || UnitParseError::Inexact {
        input: input.to_owned(),
        base,
    };

    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?
    };
    let mut value = whole_value.checked_mul(scale).ok_or_else(overflow)?;

    let frac = frac.trim_end_matches('0');
    if !frac.is_empty() {
        let digits = u32::try_from(frac.len()).map_err(|_| inexact())?;
        let divisor = 10u64.checked_pow(digits).ok_or_else(inexact)?;
        let numerator = frac.parse::<u64>().map_err(|_| overflow())?;
        let scaled = numerator.checked_mul(scale).ok_or_else(overflow)?;
        if scaled % divisor != 0 {
            return Err(inexact());
        }
        value = value.checked_add(scaled / divisor).ok_or_else(overflow)?;
    }

    Ok(value)
}

/// Clock frequency, stored in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a frequency from hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from megahertz.
    pub const fn from_mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    /// Creates a frequency from gigahertz.
    pub const fn from_ghz(ghz: u64) -> Self {
        Self(ghz * 1_000_000_000)
    }

    /// Returns the frequency in hertz.
    pub const fn as_hz(self) -> u64 {
        self.0
    }

    /// Returns `true` for a zero frequency, which no clock domain accepts.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Clock period in picoseconds (one simulator tick each), truncated.
    ///
    /// Returns `None` for a zero frequency.
    pub const fn period_ps(self) -> Option<u64> {
        match self.0 {
            0 => None,
            hz => Some(1_000_000_000_000 / hz),
        }
    }
}

impl FromStr for Frequency {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, "frequency", "hertz", FREQUENCY_UNITS).map(Self)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            hz if hz != 0 && hz % 1_000_000_000 == 0 => write!(f, "{}GHz", hz / 1_000_000_000),
            hz if hz != 0 && hz % 1_000_000 == 0 => write!(f, "{}MHz", hz / 1_000_000),
            hz if hz != 0 && hz % 1_000 == 0 => write!(f, "{}kHz", hz / 1_000),
            hz => write!(f, "{hz}Hz"),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = UnitParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

/// Supply voltage, stored in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Voltage(u64);

impl Voltage {
    /// Creates a voltage from millivolts.
    pub const fn from_millivolts(mv: u64) -> Self {
        Self(mv)
    }

    /// Returns the voltage in millivolts.
    pub const fn as_millivolts(self) -> u64 {
        self.0
    }

    /// Returns `true` for 0 V.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Voltage {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, "voltage", "millivolts", VOLTAGE_UNITS).map(Self)
    }
}

impl fmt::Display for Voltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let volts = self.0 / 1_000;
        let millis = self.0 % 1_000;
        if millis == 0 {
            write!(f, "{volts}V")
        } else {
            let frac = format!("{millis:03}");
            write!(f, "{volts}.{}V", frac.trim_end_matches('0'))
        }
    }
}

impl TryFrom<String> for Voltage {
    type Error = UnitParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Voltage> for String {
    fn from(value: Voltage) -> Self {
        value.to_string()
    }
}

/// Capacity in bytes. `k`, `M`, `G`, and `T` prefixes are binary (1024-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ByteSize(u64);

impl ByteSize {
    /// Creates a size from bytes.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Creates a size from kibibytes.
    pub const fn from_kib(kib: u64) -> Self {
        Self(kib << 10)
    }

    /// Creates a size from mebibytes.
    pub const fn from_mib(mib: u64) -> Self {
        Self(mib << 20)
    }

    /// Creates a size from gibibytes.
    pub const fn from_gib(gib: u64) -> Self {
        Self(gib << 30)
    }

    /// Returns the size in bytes.
    pub const fn as_bytes(self) -> u64 {
        self.0
    }

    /// Returns `true` for an empty size.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for ByteSize {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, "size", "bytes", BYTE_UNITS).map(Self)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KIB: u64 = 1 << 10;
        const MIB: u64 = 1 << 20;
        const GIB: u64 = 1 << 30;
        const TIB: u64 = 1 << 40;

        match self.0 {
            0 => write!(f, "0B"),
            b if b % TIB == 0 => write!(f, "{}TB", b / TIB),
            b if b % GIB == 0 => write!(f, "{}GB", b / GIB),
            b if b % MIB == 0 => write!(f, "{}MB", b / MIB),
            b if b % KIB == 0 => write!(f, "{}kB", b / KIB),
            b => write!(f, "{b}B"),
        }
    }
}

impl TryFrom<String> for ByteSize {
    type Error = UnitParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ByteSize> for String {
    fn from(value: ByteSize) -> Self {
        value.to_string()
    }
}
