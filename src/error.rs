//! Error types for cycle execution.
//!
//! The `CycleError` enum represents the conditions that abort the remainder
//! of a work cycle. Peripheral error details stay behind the trait seams;
//! the cycle boundary only records which step failed.

use crate::storage::StorageErrorKind;
use core::fmt;

/// Cycle error type.
///
/// A variant names the step of the work cycle that failed. The timer stays
/// armed when a cycle errors out; the platform's timer glue decides what to
/// do with the diagnostic (typically print it and wait for the next period).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CycleError {
    /// Potentiometer sample could not be read
    Potentiometer,

    /// PWM duty update was rejected
    Pwm,

    /// Greeting transmit on the uplink serial port failed
    SerialTx,

    /// Draining the downlink serial port failed
    SerialRx,

    /// Character display clear or write failed
    Display,

    /// Dispatch of the report task to the secondary core failed
    Fork,

    /// Unrecoverable storage failure, classified by kind
    Storage(StorageErrorKind),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::Potentiometer => write!(f, "potentiometer read failed"),
            CycleError::Pwm => write!(f, "PWM duty update failed"),
            CycleError::SerialTx => write!(f, "serial transmit failed"),
            CycleError::SerialRx => write!(f, "serial receive failed"),
            CycleError::Display => write!(f, "display write failed"),
            CycleError::Fork => write!(f, "secondary core dispatch failed"),
            CycleError::Storage(kind) => write!(f, "storage failure: {}", kind),
        }
    }
}
