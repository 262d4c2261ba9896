//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]


use fixtures::{
    MockAnalog, MockClock, MockConsole, MockDelay, MockDisplay, MockFork, MockPwm, MockSerial,
    MockStorage,
};
use tickwork::{Board, CycleRunner, DefaultConfig};

/// Board of mocks, one per peripheral seam.
pub type MockBoard = Board<
    MockAnalog,
    MockPwm,
    MockSerial,
    MockSerial,
    MockDisplay,
    MockStorage,
    MockClock,
    MockDelay,
    MockFork,
    MockConsole,
>;

// ============================================================================
// Construction Helpers
// ============================================================================

/// Report task that does nothing; for tests that only care about dispatch.
pub fn noop_report() {}

/// Board with default mocks: one scripted potentiometer sample, empty
/// serial buffers, unmounted storage, 2.5 ms cycle clock step.
pub fn test_board() -> MockBoard {
    Board {
        potentiometer: MockAnalog::with_values(&[12345]),
        pwm: MockPwm::new(),
        uplink: MockSerial::new(),
        downlink: MockSerial::new(),
        display: MockDisplay::new(),
        storage: MockStorage::new(),
        clock: MockClock::new(),
        delay: MockDelay::new(),
        fork: MockFork::new(),
        console: MockConsole::new(),
    }
}

/// Runner over the default config with a no-op report task.
pub fn test_runner() -> CycleRunner<DefaultConfig> {
    CycleRunner::new(noop_report)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// The log line a cycle at the fixture wall clock writes for `duty`.
pub fn log_line(duty: u16) -> String {
    format!("2024/06/07 08:09:05 - ADC and PWM duty value: {}\n", duty)
}

/// Assert the storage operation sequence matches exactly.
pub fn assert_storage_ops(storage: &MockStorage, expected: &[&str]) {
    let ops: Vec<&str> = storage.ops.iter().map(String::as_str).collect();
    assert_eq!(ops, expected, "storage operation sequence mismatch");
}
