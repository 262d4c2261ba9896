//! Peripheral trait seams for platform-agnostic cycle execution.
//!
//! Every piece of hardware the work cycle touches sits behind one of these
//! narrow traits, so the cycle logic stays portable and testable on the
//! host. Platform crates implement them on top of their HAL; where the
//! ecosystem already defines the seam (`embedded_hal::pwm::SetDutyCycle`,
//! `embedded_hal::delay::DelayNs`) the cycle uses that trait directly
//! instead of duplicating it here.

use crate::report::Timestamp;
use fugit::MillisDurationU32;

// ============================================================================
// Console
// ============================================================================

/// Plain-text diagnostics sink.
///
/// All status and error messages go through this trait: no levels, no
/// structure, one line per call. Writes are best-effort by contract:
/// a diagnostic must never abort a cycle, so there is no error channel.
pub trait Console {
    /// Write one line of text (terminator appended by the implementation).
    fn write_line(&mut self, line: &str);
}

// ============================================================================
// Serial
// ============================================================================

/// Byte-oriented serial port.
///
/// Reads are non-blocking: `Ok(None)` means the receive buffer is empty
/// right now. Writes block until the bytes are handed to the hardware,
/// bounded by the port's own timeout behavior.
pub trait SerialPort {
    /// Platform-specific error type
    type Error;

    /// Transmit all bytes.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Non-blocking single-byte read.
    ///
    /// Returns:
    /// - `Ok(Some(byte))` if a byte was buffered
    /// - `Ok(None)` if the receive buffer is empty (non-blocking)
    /// - `Err(Self::Error)` on I/O error
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

// ============================================================================
// Analog input
// ============================================================================

/// One analog input channel read as an unsigned fixed-width code.
///
/// Codes are left-aligned to 16 bits regardless of the converter's native
/// resolution, matching the platform read convention the conversion
/// helpers in [`crate::sensor`] assume.
pub trait AnalogSource {
    /// Platform-specific error type
    type Error;

    /// Sample the channel once.
    fn read_u16(&mut self) -> Result<u16, Self::Error>;
}

// ============================================================================
// Character display
// ============================================================================

/// Fixed-size character grid display.
///
/// Text wraps at the grid edge; layout beyond clear-and-write is the
/// driver's business, not the cycle's.
pub trait TextDisplay {
    /// Platform-specific error type
    type Error;

    /// Blank the whole grid and home the cursor.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write text starting at the cursor.
    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
}

// ============================================================================
// Clocks and timers
// ============================================================================

/// Time sources for the cycle: a monotonic microsecond counter for
/// duration measurement and a wall clock for the displayed/logged stamp.
pub trait Clock {
    /// Monotonic microsecond counter. Only differences are meaningful.
    fn ticks_us(&mut self) -> u64;

    /// Current wall-clock time.
    fn now(&mut self) -> Timestamp;
}

/// The recurring timer that drives the work cycle.
///
/// Arming and disarming must complete in bounded time: both are called
/// from the button-edge interrupt handler. The platform implementation
/// must not re-enter the callback while a cycle is in flight; firings
/// that land during a running cycle are skipped, not queued.
pub trait CycleTimer {
    /// Arm the timer in periodic mode with the given period.
    fn start_periodic(&mut self, period: MillisDurationU32);

    /// Disarm the timer. No further callbacks fire after this returns.
    fn cancel(&mut self);
}

// ============================================================================
// Secondary core
// ============================================================================

/// Fire-and-forget dispatch to the secondary hardware core.
///
/// The task is detached: no join handle, no result channel. The cycle
/// only learns whether the launch itself was accepted.
pub trait CoreFork {
    /// Platform-specific error type
    type Error;

    /// Launch `task` on the secondary core and return immediately.
    fn fork(&mut self, task: fn()) -> Result<(), Self::Error>;
}
