//! Tick-driven step-pulse generation.
//!
//! This half of the engine is owned by the periodic timer context. It holds
//! the two STEP output pins and decides, once per tick, whether each axis
//! stops, pulses, or counts down.

use embedded_hal::digital::OutputPin;

use crate::hal::RelayBank;

use super::axis::Axis;
use super::shared::{AxisShared, SharedState};

/// The periodic step generator.
///
/// Call [`on_tick`](Self::on_tick) from the fixed-period timer handler,
/// once per 100 µs tick. The handler must run to completion before the next
/// tick fires and must never be preempted by the main loop; under that
/// contract every decision below is race-free against the
/// [`AxisController`](super::AxisController)'s setters, which refuse to
/// touch a running axis.
pub struct StepGenerator<'a, S1, S2, R> {
    shared: &'a SharedState,
    step1: S1,
    step2: S2,
    relays: R,
}

impl<'a, S1, S2, R> StepGenerator<'a, S1, S2, R>
where
    S1: OutputPin,
    S2: OutputPin,
    R: RelayBank,
{
    /// Create the generator half over the shared state arena.
    pub fn new(shared: &'a SharedState, step1: S1, step2: S2, relays: R) -> Self {
        Self {
            shared,
            step1,
            step2,
            relays,
        }
    }

    /// Service both axes for one tick.
    ///
    /// Per axis, in order: a relay trip pre-empts any pulse work for a
    /// safe-mode or relay-seeking axis; a depleted step count completes a
    /// counted move once its final pulse has both halves; and a still
    /// running axis either toggles its STEP line (when the countdown hits
    /// zero) or counts down. The edge that enters the low half of the pulse
    /// consumes one step from the count; an axis seeking its relay does not
    /// count steps at all.
    pub fn on_tick(&mut self) {
        if !self.shared.any_running() {
            return;
        }
        service_axis(self.shared.axis(Axis::One), &self.relays, Axis::One, &mut self.step1);
        service_axis(self.shared.axis(Axis::Two), &self.relays, Axis::Two, &mut self.step2);
    }
}

fn service_axis<R: RelayBank, P: OutputPin>(ax: &AxisShared, relays: &R, axis: Axis, step: &mut P) {
    if ax.running() && (ax.safe_mode() || ax.seek_until_relay()) && relays.pair_triggered(axis) {
        ax.set_running(false);
    }

    if ax.running() && !ax.seek_until_relay() && !ax.pulse_high() && ax.steps_left() == 0 {
        ax.set_running(false);
    }

    if !ax.running() {
        return;
    }

    if ax.delay_count() == 0 {
        if ax.pulse_high() {
            // Pin faults have no reporting channel from the tick context.
            let _ = step.set_high();
            ax.set_pulse_high(false);
        } else {
            let _ = step.set_low();
            ax.set_pulse_high(true);
            if !ax.seek_until_relay() {
                ax.decrement_steps();
            }
        }
        ax.reload_delay();
    } else {
        ax.decrement_delay();
    }
}
