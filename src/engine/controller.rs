//! Main-loop half of the engine: validated configuration and arm/disarm.
//!
//! Every setter here refuses to touch a running axis. That single rule is
//! what makes the split against the tick handler sound: once an axis is
//! armed, only [`StepGenerator`](super::StepGenerator) writes its fields,
//! and the main loop is limited to single atomic reads until the axis
//! stops.

use crate::config::ControllerConfig;
use crate::error::AxisError;
use crate::hal::{RelayBank, RelayStatus};

use super::axis::{Axis, AxisSet, Direction, MicrostepMode};
use super::axis::{CURRENT_MAX, CURRENT_MIN, STEP_DELAY_INVALID, STEP_DELAY_MIN};
use super::backend::AxisBackend;
use super::shared::SharedState;

/// Configuration and run control for both axes.
///
/// Owned by the main loop. Constructed over the same [`SharedState`] the
/// generator half reads, plus one [`AxisBackend`] per axis and the relay
/// bank.
pub struct AxisController<'a, A1, A2, R> {
    shared: &'a SharedState,
    axis1: A1,
    axis2: A2,
    relays: R,
}

impl<'a, A1, A2, R> AxisController<'a, A1, A2, R>
where
    A1: AxisBackend,
    A2: AxisBackend,
    R: RelayBank,
{
    /// Create the controller and drive both axes to power-up defaults:
    /// stopped, disabled, direction low, full step, minimum current,
    /// default delay, safe mode on.
    ///
    /// Must be called before the tick handler starts firing.
    ///
    /// # Errors
    ///
    /// Returns [`AxisError::Pin`] if a backend cannot drive its outputs.
    pub fn new(shared: &'a SharedState, axis1: A1, axis2: A2, relays: R) -> Result<Self, AxisError> {
        shared.reset();
        let mut controller = Self {
            shared,
            axis1,
            axis2,
            relays,
        };
        for axis in Axis::ALL {
            controller.set_enabled(axis, false)?;
            controller.set_direction(axis, Direction::Low)?;
            controller.set_microsteps(axis, MicrostepMode::Full)?;
            controller.set_current(axis, CURRENT_MIN)?;
        }
        Ok(controller)
    }

    fn backend_mut(&mut self, axis: Axis) -> &mut dyn AxisBackend {
        match axis {
            Axis::One => &mut self.axis1,
            Axis::Two => &mut self.axis2,
        }
    }

    fn backend(&self, axis: Axis) -> &dyn AxisBackend {
        match axis {
            Axis::One => &self.axis1,
            Axis::Two => &self.axis2,
        }
    }

    /// Reject configuration of a running axis.
    fn ensure_stopped(&self, axis: Axis) -> Result<(), AxisError> {
        if self.shared.is_running(axis) {
            Err(AxisError::Busy(axis))
        } else {
            Ok(())
        }
    }

    /// Arm a counted move: `steps` full pulses, no relay supervision.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running.
    pub fn set_steps(&mut self, axis: Axis, steps: u32) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        let ax = self.shared.axis(axis);
        ax.set_steps_left(steps);
        ax.set_pulse_high(false);
        ax.set_seek_until_relay(false);
        ax.set_safe_mode(false);
        Ok(())
    }

    /// Arm a counted move that also stops early if the axis's relay pair
    /// trips.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running.
    pub fn set_safe_steps(&mut self, axis: Axis, steps: u32) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        let ax = self.shared.axis(axis);
        ax.set_steps_left(steps);
        ax.set_pulse_high(false);
        ax.set_seek_until_relay(false);
        ax.set_safe_mode(true);
        Ok(())
    }

    /// Arm indefinite stepping until the axis's relay pair trips. The step
    /// count is ignored in this mode.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running.
    pub fn set_seek_until_relay(&mut self, axis: Axis) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        let ax = self.shared.axis(axis);
        ax.set_steps_left(0);
        ax.set_pulse_high(false);
        ax.set_seek_until_relay(true);
        ax.set_safe_mode(true);
        Ok(())
    }

    /// Start every axis in the set.
    ///
    /// When neither axis is currently running, the global run gate is
    /// dropped first so that arming both axes in one call is atomic with
    /// respect to the tick handler: both become running before the gate is
    /// re-raised, which synchronizes their first pulse edges.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] if any requested axis is already
    /// running; no axis is started in that case.
    pub fn start(&mut self, axes: AxisSet) -> Result<(), AxisError> {
        for axis in axes.iter() {
            if self.shared.is_running(axis) {
                return Err(AxisError::Busy(axis));
            }
        }

        if !self.shared.is_running(Axis::One) && !self.shared.is_running(Axis::Two) {
            self.shared.set_any_running(false);
        }

        for axis in axes.iter() {
            let ax = self.shared.axis(axis);
            ax.set_delay_count(0);
            ax.set_running(true);
        }

        self.shared.set_any_running(true);
        Ok(())
    }

    /// Stop every axis in the set.
    ///
    /// Stopping both axes drops the global run gate first so they halt on
    /// the same tick; stopping one axis leaves the other's run state and
    /// counters untouched.
    pub fn stop(&mut self, axes: AxisSet) {
        if axes.contains(Axis::One) && axes.contains(Axis::Two) {
            self.shared.set_any_running(false);
        }
        for axis in axes.iter() {
            self.shared.axis(axis).set_running(false);
        }
    }

    /// Whether the axis is currently stepping. A single atomic load.
    #[inline]
    pub fn is_moving(&self, axis: Axis) -> bool {
        self.shared.is_running(axis)
    }

    /// Drive the axis's enable line.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running, or
    /// [`AxisError::Pin`] on a pin fault.
    pub fn set_enabled(&mut self, axis: Axis, enabled: bool) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        self.backend_mut(axis).set_enabled(enabled)
    }

    /// Read the enable line back from the output latch.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Pin`] on a pin fault.
    pub fn is_enabled(&mut self, axis: Axis) -> Result<bool, AxisError> {
        self.backend_mut(axis).is_enabled()
    }

    /// Set the axis's microstep mode.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running, or
    /// [`AxisError::Pin`] on a pin fault.
    pub fn set_microsteps(&mut self, axis: Axis, mode: MicrostepMode) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        self.backend_mut(axis).set_microsteps(mode)
    }

    /// Read the microstep mode back from the MS1/MS2 output latches.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Pin`] on a pin fault.
    pub fn microsteps(&mut self, axis: Axis) -> Result<MicrostepMode, AxisError> {
        self.backend_mut(axis).microsteps()
    }

    /// Set the axis's direction line.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running, or
    /// [`AxisError::Pin`] on a pin fault.
    pub fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        self.backend_mut(axis).set_direction(direction)
    }

    /// Read the direction back from the output latch.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Pin`] on a pin fault.
    pub fn direction(&mut self, axis: Axis) -> Result<Direction, AxisError> {
        self.backend_mut(axis).direction()
    }

    /// Set the axis's raw drive current.
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running or
    /// [`AxisError::CurrentOutOfRange`] above [`CURRENT_MAX`]; the DAC is
    /// untouched on failure.
    pub fn set_current(&mut self, axis: Axis, raw: u16) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        if raw > CURRENT_MAX {
            return Err(AxisError::CurrentOutOfRange(raw));
        }
        self.backend_mut(axis).set_current(raw);
        Ok(())
    }

    /// Read the raw drive current back from the DAC register.
    #[inline]
    pub fn current(&self, axis: Axis) -> u16 {
        self.backend(axis).current()
    }

    /// Set the axis's step delay in ticks (half-period reload value).
    ///
    /// # Errors
    ///
    /// Fails with [`AxisError::Busy`] while the axis is running or
    /// [`AxisError::InvalidStepDelay`] for zero or the reserved sentinel.
    pub fn set_step_delay(&mut self, axis: Axis, ticks: u16) -> Result<(), AxisError> {
        self.ensure_stopped(axis)?;
        if !(STEP_DELAY_MIN..STEP_DELAY_INVALID).contains(&ticks) {
            return Err(AxisError::InvalidStepDelay(ticks));
        }
        self.shared.axis(axis).set_delay_ticks(ticks);
        Ok(())
    }

    /// The axis's configured step delay in ticks.
    #[inline]
    pub fn step_delay(&self, axis: Axis) -> u16 {
        self.shared.axis(axis).delay_ticks()
    }

    /// Snapshot of all four relay contacts.
    #[inline]
    pub fn relay_status(&self) -> RelayStatus {
        self.relays.contacts()
    }

    /// Replay a parsed configuration through the normal validated setters.
    ///
    /// # Errors
    ///
    /// Fails on the first value a setter rejects; earlier axes keep the
    /// values already applied.
    pub fn apply_defaults(&mut self, config: &ControllerConfig) -> Result<(), AxisError> {
        for axis in Axis::ALL {
            let defaults = config.axis(axis);
            self.set_enabled(axis, defaults.enabled)?;
            self.set_direction(axis, defaults.direction)?;
            self.set_microsteps(axis, defaults.microsteps)?;
            self.set_current(axis, defaults.current)?;
            self.set_step_delay(axis, defaults.step_delay)?;
        }
        Ok(())
    }
}
