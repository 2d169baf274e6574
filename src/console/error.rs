//! Console error type and operator-facing rendering.
//!
//! Handlers return these instead of printing failures themselves; the
//! dispatcher renders every variant through the `Display` impl, so the
//! wording of the transcript lives in exactly one place.

use core::fmt;

use super::commands::CommandSpec;
use super::ports::{RadioError, SensorError, StoreError, UnitId};

/// Everything that can go wrong between a completed line and a finished
/// handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError<'a> {
    /// First token matched no table entry.
    UnknownCommand(&'a str),
    /// Argument count outside the entry's bounds; carries the entry so
    /// its recorded usage string can be reported.
    BadArity(&'static CommandSpec),
    /// A token that should have been a number was not.
    BadNumber(&'a str),
    /// Sub-argument rejected by the handler.
    Illegal(&'static str),
    /// AES key argument is not exactly 16 bytes.
    KeyLength,
    /// The requested unit holds no data.
    UnitNotFound(UnitId),
    /// A radio setting required for `rfm init` has never been written.
    MissingSetting(&'static str),
    /// Parameter store failure.
    Store(StoreError),
    /// Radio link failure.
    Radio(RadioError),
    /// Temperature sensor failure.
    Sensor(SensorError),
}

impl fmt::Display for ConsoleError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(tok) => write!(f, "Unknown command '{}'", tok),
            Self::BadArity(spec) => {
                if spec.usage.is_empty() {
                    write!(f, "Usage: {}", spec.name)
                } else {
                    write!(f, "Usage: {} {}", spec.name, spec.usage)
                }
            }
            Self::BadNumber(tok) => write!(f, "Error: illegal number '{}'", tok),
            Self::Illegal(msg) => write!(f, "Error: {}", msg),
            Self::KeyLength => write!(f, "ERROR: key must be 16 bytes"),
            Self::UnitNotFound(id) => write!(f, "Unit {} not found", id),
            Self::MissingSetting(name) => write!(f, "ERROR: {} missing", name),
            Self::Store(e) => write!(f, "ERROR: store: {}", e),
            Self::Radio(RadioError::NotFound) => write!(f, "ERROR: No RFM69CW found"),
            Self::Radio(RadioError::NoAck) => write!(f, "ERROR:No response"),
            Self::Radio(e) => write!(f, "ERROR: radio: {}", e),
            Self::Sensor(e) => write!(f, "ERROR: sensor: {}", e),
        }
    }
}

impl From<StoreError> for ConsoleError<'_> {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<RadioError> for ConsoleError<'_> {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

impl From<SensorError> for ConsoleError<'_> {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}
