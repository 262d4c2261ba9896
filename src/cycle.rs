//! The periodic work cycle: board bundle and cycle runner.
//!
//! `CycleRunner::run_cycle` is the timer callback body. It walks a fixed
//! sequence of peripheral operations every period and returns a
//! [`CycleReport`] (or the error that aborted the cycle) to the platform
//! timer glue. Overlap is ruled out by construction: the runner and the
//! board are both borrowed mutably for the whole cycle, so a second
//! invocation cannot begin while one is in flight.

use crate::config::CycleConfig;
use crate::error::CycleError;
use crate::hal::{AnalogSource, Clock, Console, CoreFork, SerialPort, TextDisplay};
use crate::report::{CoreMode, CycleReport, LogRecord};
use crate::storage::{Storage, StorageError, StorageErrorKind};
use core::fmt::Write;
use core::marker::PhantomData;
use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;

// ============================================================================
// Board bundle
// ============================================================================

/// Every peripheral one work cycle touches, bundled for the runner.
///
/// A plain aggregate with public fields: platform bring-up constructs it
/// once and hands it to the timer glue together with the runner. The
/// temperature sensor is deliberately absent: it lives inside the shared
/// report task ([`crate::sensor::SharedReport`]) because the secondary
/// core needs it too.
pub struct Board<A, P, TX, RX, D, S, K, DL, F, W> {
    /// General-purpose analog channel sampled for the PWM duty
    pub potentiometer: A,

    /// PWM output driven by the potentiometer sample
    pub pwm: P,

    /// Serial port transmitting the fixed greeting each cycle
    pub uplink: TX,

    /// Serial port drained and decoded each cycle
    pub downlink: RX,

    /// Character display rewritten with the wall-clock stamp each cycle
    pub display: D,

    /// Mountable log filesystem
    pub storage: S,

    /// Monotonic and wall-clock time source
    pub clock: K,

    /// Blocking delay provider for the serial settle
    pub delay: DL,

    /// Secondary-core dispatch
    pub fork: F,

    /// Plain-text diagnostics sink
    pub console: W,
}

impl<A, P, TX, RX, D, S, K, DL, F, W> core::fmt::Debug for Board<A, P, TX, RX, D, S, K, DL, F, W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Board").finish_non_exhaustive()
    }
}

// ============================================================================
// Cycle runner
// ============================================================================

/// Periodic cycle dispatcher.
///
/// Holds the state that survives between cycles: the core-mode flag that
/// alternates the temperature report between the two cores, and the
/// detached report task itself (a plain `fn()`, typically
/// `|| SHARED_REPORT.run()` lowered to a named function).
pub struct CycleRunner<C: CycleConfig> {
    core_mode: CoreMode,
    task: fn(),
    _config: PhantomData<C>,
}

impl<C: CycleConfig> CycleRunner<C> {
    /// New runner around the detached report task.
    ///
    /// The core mode starts at `Inline` and is flipped before each
    /// dispatch, so the first cycle forks.
    pub const fn new(task: fn()) -> Self {
        Self {
            core_mode: CoreMode::Inline,
            task,
            _config: PhantomData,
        }
    }

    /// Core mode the most recent cycle used.
    pub fn core_mode(&self) -> CoreMode {
        self.core_mode
    }

    /// Run one work cycle. This is the timer callback body.
    ///
    /// Steps run strictly in order; the first failing step aborts the
    /// remainder of the cycle and the error propagates to the platform's
    /// handler. The timer stays armed either way. The two expected
    /// storage conditions (mount on an already-mounted filesystem,
    /// unmount on an already-unmounted one) print a diagnostic and let
    /// the cycle continue instead of aborting it.
    pub fn run_cycle<A, P, TX, RX, D, S, K, DL, F, W>(
        &mut self,
        board: &mut Board<A, P, TX, RX, D, S, K, DL, F, W>,
    ) -> Result<CycleReport, CycleError>
    where
        A: AnalogSource,
        P: SetDutyCycle,
        TX: SerialPort,
        RX: SerialPort,
        D: TextDisplay,
        S: Storage,
        K: Clock,
        DL: DelayNs,
        F: CoreFork,
        W: Console,
    {
        let Board {
            potentiometer,
            pwm,
            uplink,
            downlink,
            display,
            storage,
            clock,
            delay,
            fork,
            console,
        } = board;

        let started = clock.ticks_us();

        // Alternate the report between the two cores, one cycle each.
        self.core_mode = self.core_mode.flipped();
        match self.core_mode {
            CoreMode::Forked => fork.fork(self.task).map_err(|_| CycleError::Fork)?,
            CoreMode::Inline => (self.task)(),
        }

        // Potentiometer straight through to the PWM duty, no filtering.
        let duty = potentiometer.read_u16().map_err(|_| CycleError::Potentiometer)?;
        pwm.set_duty_cycle_fraction(duty, u16::MAX)
            .map_err(|_| CycleError::Pwm)?;

        // Greeting out, settle, then drain whatever the downlink buffered.
        uplink
            .write_all(C::GREETING)
            .map_err(|_| CycleError::SerialTx)?;
        delay.delay_ms(C::SETTLE_DELAY_MS);

        let mut raw: heapless::Vec<u8, 128> = heapless::Vec::new(); // TODO: use C::RX_CAPACITY when const generics allow
        while let Some(byte) = downlink.read_byte().map_err(|_| CycleError::SerialRx)? {
            if raw.push(byte).is_err() {
                // Buffer full; the rest stays queued for the next cycle.
                break;
            }
        }
        let mut text: heapless::String<128> = heapless::String::new();
        decode_dropping_invalid(&raw, &mut text);
        console.write_line(&text);
        let rx_bytes = raw.len();

        // One wall-clock read serves both the display and the log record.
        let stamp = clock.now();
        display.clear().map_err(|_| CycleError::Display)?;
        let mut shown: heapless::String<32> = heapless::String::new();
        let _ = write!(shown, "{}", stamp);
        display.write_text(&shown).map_err(|_| CycleError::Display)?;

        // Storage window: mount, list, append, read back, unmount.
        let line = LogRecord { stamp, duty }.to_line();

        if let Err(e) = storage.mount() {
            match e.kind() {
                StorageErrorKind::AlreadyMounted => {
                    console.write_line("storage already mounted, reusing active mount");
                }
                kind => return Err(CycleError::Storage(kind)),
            }
        }
        console.write_line("storage root contains:");
        storage
            .list_root(&mut |name| console.write_line(name))
            .map_err(|e| CycleError::Storage(e.kind()))?;

        let written = storage
            .append(C::LOG_PATH, line.as_bytes())
            .map_err(|e| CycleError::Storage(e.kind()))?;
        let mut diag: heapless::String<48> = heapless::String::new();
        let _ = write!(diag, "{} bytes written", written);
        console.write_line(&diag);

        let total = storage
            .read_total(C::LOG_PATH)
            .map_err(|e| CycleError::Storage(e.kind()))?;
        diag.clear();
        let _ = write!(diag, "{} bytes read", total);
        console.write_line(&diag);

        if let Err(e) = storage.unmount() {
            match e.kind() {
                StorageErrorKind::NotMounted => {
                    console.write_line("storage already unmounted");
                }
                kind => return Err(CycleError::Storage(kind)),
            }
        }

        // Elapsed time and overrun check against the timer period.
        let duration_us = clock.ticks_us().wrapping_sub(started);
        let overran = duration_us > u64::from(C::CYCLE_PERIOD_MS) * 1_000;
        let mut summary: heapless::String<64> = heapless::String::new();
        let _ = write!(summary, "cycle finished in {}us ({})", duration_us, self.core_mode);
        console.write_line(&summary);
        if overran {
            console.write_line("cycle overran its period");
        }

        Ok(CycleReport {
            duty,
            core_mode: self.core_mode,
            rx_bytes,
            duration_us,
            overran,
        })
    }
}

impl<C: CycleConfig> core::fmt::Debug for CycleRunner<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CycleRunner")
            .field("core_mode", &self.core_mode)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// UTF-8 drain decoding
// ============================================================================

/// Decode `bytes` as UTF-8 into `out`, dropping invalid sequences.
///
/// Invalid bytes are skipped, not replaced. Stops early once `out` is
/// full; a truncated multi-byte sequence at the end of the drain is
/// dropped like any other invalid input.
fn decode_dropping_invalid<const N: usize>(bytes: &[u8], out: &mut heapless::String<N>) {
    let mut rest = bytes;
    loop {
        match core::str::from_utf8(rest) {
            Ok(chunk) => {
                let _ = out.push_str(chunk);
                break;
            }
            Err(err) => {
                let (valid, tail) = rest.split_at(err.valid_up_to());
                let chunk = core::str::from_utf8(valid).unwrap_or("");
                if out.push_str(chunk).is_err() {
                    break;
                }
                match err.error_len() {
                    Some(skip) => rest = &tail[skip..],
                    None => break,
                }
            }
        }
    }
}
