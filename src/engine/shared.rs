//! Shared per-axis state arena.
//!
//! One record per axis plus one global run flag, all single-word atomics.
//! Two contexts touch this state: the periodic tick handler (which runs to
//! completion and is never preempted by the main loop) and the main loop's
//! configuration calls. Setters are gated on `running == false`, so a
//! running axis's fields are written only by the tick handler and a stopped
//! axis's fields only by the main loop; `Relaxed` ordering is sufficient
//! under that contract.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use super::axis::{Axis, STEP_DELAY_DEFAULT};

/// Per-axis runtime state shared between the tick handler and the main loop.
#[derive(Debug)]
pub(crate) struct AxisShared {
    running: AtomicBool,
    steps_left: AtomicU32,
    pulse_high: AtomicBool,
    delay_ticks: AtomicU16,
    delay_count: AtomicU16,
    seek_until_relay: AtomicBool,
    safe_mode: AtomicBool,
}

impl AxisShared {
    const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            steps_left: AtomicU32::new(0),
            pulse_high: AtomicBool::new(false),
            delay_ticks: AtomicU16::new(STEP_DELAY_DEFAULT),
            delay_count: AtomicU16::new(0),
            // Safe mode until the first command says otherwise.
            seek_until_relay: AtomicBool::new(false),
            safe_mode: AtomicBool::new(true),
        }
    }

    #[inline]
    pub(crate) fn running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn steps_left(&self) -> u32 {
        self.steps_left.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_steps_left(&self, steps: u32) {
        self.steps_left.store(steps, Ordering::Relaxed);
    }

    /// Count one emitted step. Only the tick handler calls this, and only
    /// after the completion check has seen a non-zero count.
    #[inline]
    pub(crate) fn decrement_steps(&self) {
        let left = self.steps_left.load(Ordering::Relaxed);
        self.steps_left.store(left.saturating_sub(1), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn pulse_high(&self) -> bool {
        self.pulse_high.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_pulse_high(&self, high: bool) {
        self.pulse_high.store(high, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn delay_ticks(&self) -> u16 {
        self.delay_ticks.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_delay_ticks(&self, ticks: u16) {
        self.delay_ticks.store(ticks, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn delay_count(&self) -> u16 {
        self.delay_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_delay_count(&self, count: u16) {
        self.delay_count.store(count, Ordering::Relaxed);
    }

    /// Reload the countdown from the configured delay.
    #[inline]
    pub(crate) fn reload_delay(&self) {
        self.set_delay_count(self.delay_ticks());
    }

    #[inline]
    pub(crate) fn decrement_delay(&self) {
        let count = self.delay_count.load(Ordering::Relaxed);
        self.delay_count.store(count.wrapping_sub(1), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn seek_until_relay(&self) -> bool {
        self.seek_until_relay.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_seek_until_relay(&self, seek: bool) {
        self.seek_until_relay.store(seek, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn safe_mode(&self) -> bool {
        self.safe_mode.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_safe_mode(&self, safe: bool) {
        self.safe_mode.store(safe, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.set_running(false);
        self.set_steps_left(0);
        self.set_pulse_high(false);
        self.set_delay_ticks(STEP_DELAY_DEFAULT);
        self.set_delay_count(0);
        self.set_seek_until_relay(false);
        self.set_safe_mode(true);
    }
}

/// The engine's shared state: a global run gate plus one record per axis.
///
/// Create one instance (typically `static`) and hand references to both
/// halves of the engine:
///
/// ```rust,ignore
/// static SHARED: SharedState = SharedState::new();
///
/// let generator = StepGenerator::new(&SHARED, step1, step2, relays);
/// let controller = AxisController::new(&SHARED, axis1, axis2, relays)?;
/// ```
#[derive(Debug)]
pub struct SharedState {
    any_running: AtomicBool,
    axes: [AxisShared; 2],
}

impl SharedState {
    /// Create a state arena with power-up defaults.
    pub const fn new() -> Self {
        Self {
            any_running: AtomicBool::new(false),
            axes: [AxisShared::new(), AxisShared::new()],
        }
    }

    #[inline]
    pub(crate) fn axis(&self, axis: Axis) -> &AxisShared {
        &self.axes[axis.index()]
    }

    /// Whether any axis is armed. The tick handler's fast-exit gate.
    #[inline]
    pub(crate) fn any_running(&self) -> bool {
        self.any_running.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_any_running(&self, running: bool) {
        self.any_running.store(running, Ordering::Relaxed);
    }

    /// Single atomic load of an axis's running flag.
    #[inline]
    pub(crate) fn is_running(&self, axis: Axis) -> bool {
        self.axis(axis).running()
    }

    /// Restore power-up defaults on every field.
    pub(crate) fn reset(&self) {
        self.set_any_running(false);
        for axis in &self.axes {
            axis.reset();
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_up_defaults() {
        let shared = SharedState::new();
        assert!(!shared.any_running());
        for axis in Axis::ALL {
            let ax = shared.axis(axis);
            assert!(!ax.running());
            assert_eq!(ax.steps_left(), 0);
            assert!(!ax.pulse_high());
            assert_eq!(ax.delay_ticks(), STEP_DELAY_DEFAULT);
            assert!(!ax.seek_until_relay());
            assert!(ax.safe_mode());
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let shared = SharedState::new();
        let ax = shared.axis(Axis::Two);
        ax.set_running(true);
        ax.set_steps_left(500);
        ax.set_safe_mode(false);
        shared.set_any_running(true);

        shared.reset();
        assert!(!shared.any_running());
        assert!(!ax.running());
        assert_eq!(ax.steps_left(), 0);
        assert!(ax.safe_mode());
    }
}
