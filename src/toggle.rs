//! Start/stop execution toggle driven by the button-edge interrupt.
//!
//! A recurring timer calling the cycle beats an infinite main loop: the
//! main context stays free between cycles, so the supervisory channel to
//! the host remains responsive and a running board can still be stopped
//! and reflashed without cutting power. The toggle owns the two-state
//! machine that arms and disarms that timer.

use crate::config::CycleConfig;
use crate::hal::{Console, CycleTimer};
use crate::storage::{Storage, StorageError, StorageErrorKind};
use core::marker::PhantomData;
use fugit::ExtU32;

/// Execution state of the work cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Timer disarmed, no cycles fire. Initial state.
    Stopped,

    /// Timer armed, one cycle per period.
    Running,
}

/// What a button edge did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Stopped -> Running: the timer is now armed
    Started,

    /// Running -> Stopped: the timer is now disarmed; the caller should
    /// release storage next (see [`release_storage`])
    Stopped,
}

/// Two-state start/stop toggle, flipped by the rising edge of the button.
///
/// `on_button_edge` only flips state and arms or disarms the timer:
/// bounded, non-blocking work, safe to call from the interrupt handler
/// directly. Edges of the same source are not re-entrant on the target
/// platforms, so no further synchronization guards the state.
pub struct RunToggle<C: CycleConfig> {
    state: RunState,
    _config: PhantomData<C>,
}

impl<C: CycleConfig> RunToggle<C> {
    /// New toggle in the `Stopped` state.
    pub const fn new() -> Self {
        Self {
            state: RunState::Stopped,
            _config: PhantomData,
        }
    }

    /// Current execution state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while the timer is armed.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Handle one rising edge of the monitored input.
    ///
    /// Arms the periodic timer with the configured period when stopped,
    /// disarms it when running. On a `Stopped` transition the caller is
    /// responsible for calling [`release_storage`], from the interrupt
    /// tail where the platform allows blocking there or deferred to the
    /// main context where it does not.
    pub fn on_button_edge<T: CycleTimer>(&mut self, timer: &mut T) -> Transition {
        match self.state {
            RunState::Stopped => {
                timer.start_periodic(C::CYCLE_PERIOD_MS.millis());
                self.state = RunState::Running;
                Transition::Started
            }
            RunState::Running => {
                timer.cancel();
                self.state = RunState::Stopped;
                Transition::Stopped
            }
        }
    }
}

impl<C: CycleConfig> Default for RunToggle<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CycleConfig> core::fmt::Debug for RunToggle<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunToggle").field("state", &self.state).finish()
    }
}

/// Best-effort storage release after a `Stopped` transition.
///
/// A cycle may have been aborted between its mount and unmount, so the
/// filesystem can be in either state here. An already-unmounted filesystem
/// is the expected case and stays silent; any other failure is logged and
/// discarded, since shutdown has nobody left to propagate to.
pub fn release_storage<S, W>(storage: &mut S, console: &mut W)
where
    S: Storage,
    W: Console,
{
    if let Err(e) = storage.unmount() {
        match e.kind() {
            StorageErrorKind::NotMounted => {}
            _ => console.write_line("storage release failed, card state unknown"),
        }
    }
}
