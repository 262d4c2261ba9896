//! # tickwork
//!
//! Lightweight timer-driven peripheral work cycles for embedded systems.
//!
//! **Key features:**
//! - **Two-state execution toggle** - A button edge arms or disarms the
//!   recurring cycle timer; stop performs best-effort storage release
//! - **Fixed-sequence work cycle** - ADC-to-PWM passthrough, serial
//!   greeting and drain, display stamp, storage log, duration report
//! - **Dual-core alternation** - The temperature report runs inline one
//!   cycle and detached on the secondary core the next, behind a
//!   critical-section lock scoped to exactly the read-and-print
//! - **Trait-seam hardware** - Every peripheral is a narrow trait;
//!   platform crates implement them, host tests mock them
//! - **Static allocation** - heapless buffers throughout, zero heap usage
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;

// Peripheral seams
pub mod hal;
pub mod storage;

// Cycle value types
pub mod report;

// Conversion and the shared temperature task
pub mod sensor;

// The two cooperating components: start/stop toggle and cycle runner
pub mod cycle;
pub mod toggle;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Configuration
pub use config::{CycleConfig, DefaultConfig};

// Error types
pub use error::CycleError;

// Peripheral seams
pub use hal::{AnalogSource, Clock, Console, CoreFork, CycleTimer, SerialPort, TextDisplay};
pub use storage::{Storage, StorageError, StorageErrorKind};

// Cycle value types
pub use report::{CoreMode, CycleReport, LogRecord, Timestamp};

// Temperature report
pub use sensor::{SharedReport, TemperatureReport};

// Components
pub use cycle::{Board, CycleRunner};
pub use toggle::{release_storage, RunState, RunToggle, Transition};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
