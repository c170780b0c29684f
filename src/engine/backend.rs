//! Per-axis output backends.
//!
//! The enable, direction, and microstep lines plus the drive-current DAC
//! form one axis's configuration surface. The output latch is the state of
//! record: getters read back the pins rather than a software shadow copy,
//! which is why this is a capability interface instead of a struct of
//! cached fields.

use embedded_hal::digital::StatefulOutputPin;

use crate::error::AxisError;
use crate::hal::CurrentDac;

use super::axis::{Direction, MicrostepMode};

/// Configuration outputs of a single axis.
///
/// Implementations report hardware faults as [`AxisError::Pin`]; range and
/// busy validation happens in the controller before any method here is
/// called.
pub trait AxisBackend {
    /// Drive the enable line. `enabled` is the logical state; electrical
    /// polarity is the implementation's concern.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), AxisError>;

    /// Read the logical enable state back from the output.
    fn is_enabled(&mut self) -> Result<bool, AxisError>;

    /// Drive the direction line.
    fn set_direction(&mut self, direction: Direction) -> Result<(), AxisError>;

    /// Read the direction back from the output.
    fn direction(&mut self) -> Result<Direction, AxisError>;

    /// Drive the MS1/MS2 mode lines.
    fn set_microsteps(&mut self, mode: MicrostepMode) -> Result<(), AxisError>;

    /// Recover the mode from the MS1/MS2 outputs.
    fn microsteps(&mut self) -> Result<MicrostepMode, AxisError>;

    /// Write the raw drive-current value. The caller has already bounded it.
    fn set_current(&mut self, raw: u16);

    /// Read the raw drive-current value back from the DAC register.
    fn current(&self) -> u16;
}

/// [`AxisBackend`] over embedded-hal stateful pins and a DAC channel.
///
/// The enable line is active low: logical enabled drives the pin low.
pub struct GpioAxis<EN, DIR, MS1, MS2, DAC> {
    enable: EN,
    dir: DIR,
    ms1: MS1,
    ms2: MS2,
    dac: DAC,
}

impl<EN, DIR, MS1, MS2, DAC> GpioAxis<EN, DIR, MS1, MS2, DAC>
where
    EN: StatefulOutputPin,
    DIR: StatefulOutputPin,
    MS1: StatefulOutputPin,
    MS2: StatefulOutputPin,
    DAC: CurrentDac,
{
    /// Bundle one axis's output pins and DAC channel.
    pub fn new(enable: EN, dir: DIR, ms1: MS1, ms2: MS2, dac: DAC) -> Self {
        Self {
            enable,
            dir,
            ms1,
            ms2,
            dac,
        }
    }

    fn set_line<P: StatefulOutputPin>(pin: &mut P, high: bool) -> Result<(), AxisError> {
        if high {
            pin.set_high().map_err(|_| AxisError::Pin)
        } else {
            pin.set_low().map_err(|_| AxisError::Pin)
        }
    }
}

impl<EN, DIR, MS1, MS2, DAC> AxisBackend for GpioAxis<EN, DIR, MS1, MS2, DAC>
where
    EN: StatefulOutputPin,
    DIR: StatefulOutputPin,
    MS1: StatefulOutputPin,
    MS2: StatefulOutputPin,
    DAC: CurrentDac,
{
    fn set_enabled(&mut self, enabled: bool) -> Result<(), AxisError> {
        // Active low.
        Self::set_line(&mut self.enable, !enabled)
    }

    fn is_enabled(&mut self) -> Result<bool, AxisError> {
        self.enable
            .is_set_low()
            .map_err(|_| AxisError::Pin)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), AxisError> {
        Self::set_line(&mut self.dir, direction == Direction::High)
    }

    fn direction(&mut self) -> Result<Direction, AxisError> {
        let high = self.dir.is_set_high().map_err(|_| AxisError::Pin)?;
        Ok(if high { Direction::High } else { Direction::Low })
    }

    fn set_microsteps(&mut self, mode: MicrostepMode) -> Result<(), AxisError> {
        let (ms1, ms2) = mode.lines();
        Self::set_line(&mut self.ms1, ms1)?;
        Self::set_line(&mut self.ms2, ms2)
    }

    fn microsteps(&mut self) -> Result<MicrostepMode, AxisError> {
        let ms1 = self.ms1.is_set_high().map_err(|_| AxisError::Pin)?;
        let ms2 = self.ms2.is_set_high().map_err(|_| AxisError::Pin)?;
        Ok(MicrostepMode::from_lines(ms1, ms2))
    }

    fn set_current(&mut self, raw: u16) {
        self.dac.set(raw);
    }

    fn current(&self) -> u16 {
        self.dac.raw()
    }
}
