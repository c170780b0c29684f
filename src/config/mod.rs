//! Controller configuration.
//!
//! Power-up defaults for both axes, loadable from TOML (with the `std`
//! feature) or built in code. This is a host-side convenience for
//! initializing the volatile device state — nothing is persisted on the
//! device, which always boots to the built-in defaults.

#[cfg(feature = "std")]
mod loader;

use serde::Deserialize;

use crate::engine::{Axis, Direction, MicrostepMode};
use crate::engine::{CURRENT_MAX, CURRENT_MIN, STEP_DELAY_DEFAULT, STEP_DELAY_INVALID, STEP_DELAY_MIN};
use crate::error::{AxisError, Error, Result};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

/// Startup values for one axis.
///
/// `Default` matches the device's power-up state, so a partial TOML table
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AxisDefaults {
    /// Whether the driver's enable line is asserted.
    #[serde(default)]
    pub enabled: bool,

    /// Direction line level.
    #[serde(default)]
    pub direction: Direction,

    /// Microstep divisor (1, 2, 4, or 16).
    #[serde(default)]
    pub microsteps: MicrostepMode,

    /// Raw drive-current value.
    #[serde(default = "default_current")]
    pub current: u16,

    /// Step delay in ticks.
    #[serde(default = "default_step_delay")]
    pub step_delay: u16,
}

fn default_current() -> u16 {
    CURRENT_MIN
}

fn default_step_delay() -> u16 {
    STEP_DELAY_DEFAULT
}

impl Default for AxisDefaults {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: Direction::Low,
            microsteps: MicrostepMode::Full,
            current: CURRENT_MIN,
            step_delay: STEP_DELAY_DEFAULT,
        }
    }
}

/// Startup configuration for the whole controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ControllerConfig {
    /// Axis 1 defaults.
    #[serde(default)]
    pub axis1: AxisDefaults,

    /// Axis 2 defaults.
    #[serde(default)]
    pub axis2: AxisDefaults,
}

impl ControllerConfig {
    /// The defaults for one axis.
    pub fn axis(&self, axis: Axis) -> &AxisDefaults {
        match axis {
            Axis::One => &self.axis1,
            Axis::Two => &self.axis2,
        }
    }
}

/// Validate a controller configuration.
///
/// Checks the same bounds the live setters enforce, so a config that
/// validates here will also apply cleanly.
///
/// # Errors
///
/// Returns the first out-of-range value as an [`AxisError`].
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    for axis in Axis::ALL {
        let defaults = config.axis(axis);
        if defaults.current > CURRENT_MAX {
            return Err(Error::Axis(AxisError::CurrentOutOfRange(defaults.current)));
        }
        if !(STEP_DELAY_MIN..STEP_DELAY_INVALID).contains(&defaults.step_delay) {
            return Err(Error::Axis(AxisError::InvalidStepDelay(defaults.step_delay)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_power_up_state() {
        let defaults = AxisDefaults::default();
        assert!(!defaults.enabled);
        assert_eq!(defaults.direction, Direction::Low);
        assert_eq!(defaults.microsteps, MicrostepMode::Full);
        assert_eq!(defaults.current, CURRENT_MIN);
        assert_eq!(defaults.step_delay, STEP_DELAY_DEFAULT);
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = ControllerConfig::default();
        assert!(validate_config(&config).is_ok());

        config.axis1.current = CURRENT_MAX;
        assert!(validate_config(&config).is_ok());

        config.axis1.current = CURRENT_MAX + 1;
        assert!(validate_config(&config).is_err());

        config.axis1.current = CURRENT_MIN;
        config.axis2.step_delay = 0;
        assert!(validate_config(&config).is_err());

        config.axis2.step_delay = STEP_DELAY_INVALID;
        assert!(validate_config(&config).is_err());
    }
}
