//! ADC conversion, the on-die temperature model and the shared report task.
//!
//! The temperature report is the one piece of the cycle that can run on
//! either core, so the sensor handle and its console live together behind
//! a critical-section mutex: the lock covers exactly the
//! read-convert-print sequence and never wraps blocking peripheral I/O.

use crate::config::CycleConfig;
use crate::hal::{AnalogSource, Console};
use core::cell::RefCell;
use core::fmt::Write;
use core::marker::PhantomData;
use critical_section::Mutex;

// ============================================================================
// Conversion helpers
// ============================================================================

/// Temperature at the sensor's calibration point, in degrees Celsius.
pub const TEMP_BASE_CELSIUS: f32 = 27.0;

/// Sensor junction voltage at the calibration point, in volts.
pub const TEMP_SENSOR_VBE: f32 = 0.706;

/// Sensor slope in volts per degree Celsius.
pub const TEMP_SENSOR_SLOPE: f32 = 0.001721;

/// Convert a raw ADC code to a voltage.
///
/// `code * vref / (2^bits - 1)`: monotone in `code` and bounded by
/// `[0, vref]` for codes within the converter's range.
pub fn code_to_voltage(code: u16, bits: u32, vref: f32) -> f32 {
    debug_assert!(bits >= 1 && bits <= 32);
    let full_scale = ((1u64 << bits) - 1) as f32;
    code as f32 * (vref / full_scale)
}

/// Convert a sensor voltage to degrees Celsius with the fixed linear model
/// `T = 27 - (V - 0.706) / 0.001721`.
///
/// The model is linear over its whole input domain: voltages far from the
/// calibration point extrapolate to physically implausible temperatures,
/// which is the documented behavior, not an error.
pub fn voltage_to_celsius(volts: f32) -> f32 {
    TEMP_BASE_CELSIUS - (volts - TEMP_SENSOR_VBE) / TEMP_SENSOR_SLOPE
}

// ============================================================================
// Report task
// ============================================================================

/// The temperature read-and-print task.
///
/// Owns the dedicated sensor channel and a console handle; `run` reads one
/// sample, converts it and prints the result. No return value: the forked
/// execution path has no result channel, so a read fault is reported on
/// the console instead of propagated.
pub struct TemperatureReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    sensor: A,
    console: W,
    _config: PhantomData<C>,
}

impl<C, A, W> TemperatureReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    /// Wrap the sensor channel and console into a report task.
    pub fn new(sensor: A, console: W) -> Self {
        Self {
            sensor,
            console,
            _config: PhantomData,
        }
    }

    /// Read, convert and print one temperature sample.
    pub fn run(&mut self) {
        match self.sensor.read_u16() {
            Ok(raw) => {
                let volts = code_to_voltage(raw, C::ADC_BITS, C::VREF);
                let celsius = voltage_to_celsius(volts);
                let mut line: heapless::String<48> = heapless::String::new();
                let _ = write!(line, "Board temperature: {:.2} C", celsius);
                self.console.write_line(&line);
            }
            Err(_) => self.console.write_line("temperature sensor read fault"),
        }
    }
}

impl<C, A, W> core::fmt::Debug for TemperatureReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TemperatureReport").finish_non_exhaustive()
    }
}

// ============================================================================
// Shared critical section
// ============================================================================

/// The report task behind a critical-section mutex, shareable between the
/// main context and the secondary core.
///
/// `new` is const so the platform can place one in a `static` and hand the
/// runner a plain `fn()` that calls [`SharedReport::run`]. At most one
/// context holds the lock at a time; it is held only across the
/// read-convert-print sequence.
pub struct SharedReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    inner: Mutex<RefCell<Option<TemperatureReport<C, A, W>>>>,
}

impl<C, A, W> SharedReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    /// Empty slot; `install` the task during bring-up.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put the report task into the shared slot (replaces any previous one).
    pub fn install(&self, report: TemperatureReport<C, A, W>) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).replace(report);
        });
    }

    /// Run `f` on the installed task under the lock.
    /// Returns `None` when nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut TemperatureReport<C, A, W>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Run the report under the lock. No-op while nothing is installed.
    pub fn run(&self) {
        self.with(TemperatureReport::run);
    }
}

impl<C, A, W> Default for SharedReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, W> core::fmt::Debug for SharedReport<C, A, W>
where
    C: CycleConfig,
    A: AnalogSource,
    W: Console,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedReport").finish_non_exhaustive()
    }
}
