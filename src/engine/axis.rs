//! Axis domain types.
//!
//! Closed sets for axis numbers, axis bitfields, directions, and microstep
//! modes. Every wire-facing constructor validates its input so that the rest
//! of the engine only ever sees legal values.

use serde::Deserialize;

use crate::error::{AxisError, ConfigError};

/// Maximum raw drive-current value (12-bit DAC ceiling).
pub const CURRENT_MAX: u16 = 4095;

/// Minimum raw drive-current value.
pub const CURRENT_MIN: u16 = 0;

/// Reserved invalid step-delay value; never accepted by a setter.
pub const STEP_DELAY_INVALID: u16 = u16::MAX;

/// Minimum usable step delay in ticks.
pub const STEP_DELAY_MIN: u16 = 1;

/// Power-up step delay: 50 ticks of 100 µs per half period (5 ms).
pub const STEP_DELAY_DEFAULT: u16 = 50;

/// Period of the step-generation tick in microseconds.
///
/// On the original hardware this is a 32 MHz reference divided 1:64
/// (500 kHz, 2 µs per count) with a 50-count period.
pub const TICK_PERIOD_US: u32 = 100;

/// One of the two stepper axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Axis 1 (wire number 1).
    One,
    /// Axis 2 (wire number 2).
    Two,
}

impl Axis {
    /// Both axes, in service order (axis 1 first).
    pub const ALL: [Axis; 2] = [Axis::One, Axis::Two];

    /// Decode a wire axis number.
    ///
    /// # Errors
    ///
    /// Returns `AxisError::InvalidAxis` for anything outside {1, 2}.
    pub fn from_number(number: u8) -> Result<Self, AxisError> {
        match number {
            1 => Ok(Axis::One),
            2 => Ok(Axis::Two),
            other => Err(AxisError::InvalidAxis(other)),
        }
    }

    /// The wire axis number (1 or 2).
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Axis::One => 1,
            Axis::Two => 2,
        }
    }

    /// Zero-based index into per-axis arrays.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Axis::One => 0,
            Axis::Two => 1,
        }
    }
}

/// A set of axes, as carried by the start/stop commands.
///
/// Wire encoding is a bitfield (bit 0 = axis 1, bit 1 = axis 2); membership
/// is exposed explicitly rather than through raw masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSet(u8);

impl AxisSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);
    /// Axis 1 only.
    pub const ONE: Self = Self(0x01);
    /// Axis 2 only.
    pub const TWO: Self = Self(0x02);
    /// Both axes.
    pub const BOTH: Self = Self(0x03);

    /// Decode a wire bitfield.
    ///
    /// # Errors
    ///
    /// Returns `AxisError::InvalidAxisSet` when any bit outside the two
    /// axis bits is set. The empty set is accepted.
    pub fn from_bits(bits: u8) -> Result<Self, AxisError> {
        if bits & !Self::BOTH.0 != 0 {
            Err(AxisError::InvalidAxisSet(bits))
        } else {
            Ok(Self(bits))
        }
    }

    /// The wire bitfield.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Membership test.
    #[inline]
    pub const fn contains(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    /// Whether no axis is selected.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member axes in service order.
    pub fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |&axis| self.contains(axis))
    }
}

impl From<Axis> for AxisSet {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::One => Self::ONE,
            Axis::Two => Self::TWO,
        }
    }
}

/// Logic level of the direction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Direction line low (wire value 0x00).
    #[default]
    Low,
    /// Direction line high (wire value 0x01).
    High,
}

impl Direction {
    /// Decode a wire direction byte.
    ///
    /// # Errors
    ///
    /// Returns `AxisError::InvalidDirection` for anything but 0x00/0x01.
    pub fn from_wire(byte: u8) -> Result<Self, AxisError> {
        match byte {
            0x00 => Ok(Direction::Low),
            0x01 => Ok(Direction::High),
            other => Err(AxisError::InvalidDirection(other)),
        }
    }

    /// The wire byte.
    #[inline]
    pub const fn wire(self) -> u8 {
        match self {
            Direction::Low => 0x00,
            Direction::High => 0x01,
        }
    }
}

/// Microstep mode of the driver's MS1/MS2 mode lines.
///
/// The driver hardware supports exactly these four resolutions; the wire
/// value doubles as the (ms1, ms2) line pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicrostepMode {
    /// Full steps (wire value 0).
    #[default]
    Full,
    /// Half steps (wire value 1).
    Half,
    /// Quarter steps (wire value 2).
    Quarter,
    /// Sixteenth steps (wire value 3).
    Sixteenth,
}

impl MicrostepMode {
    /// All modes in wire order.
    pub const ALL: [MicrostepMode; 4] = [
        MicrostepMode::Full,
        MicrostepMode::Half,
        MicrostepMode::Quarter,
        MicrostepMode::Sixteenth,
    ];

    /// Decode a wire mode byte.
    ///
    /// # Errors
    ///
    /// Returns `AxisError::InvalidMicrosteps` for values above 3.
    pub fn from_wire(byte: u8) -> Result<Self, AxisError> {
        match byte {
            0 => Ok(MicrostepMode::Full),
            1 => Ok(MicrostepMode::Half),
            2 => Ok(MicrostepMode::Quarter),
            3 => Ok(MicrostepMode::Sixteenth),
            other => Err(AxisError::InvalidMicrosteps(other)),
        }
    }

    /// The wire byte.
    #[inline]
    pub const fn wire(self) -> u8 {
        match self {
            MicrostepMode::Full => 0,
            MicrostepMode::Half => 1,
            MicrostepMode::Quarter => 2,
            MicrostepMode::Sixteenth => 3,
        }
    }

    /// The (ms1, ms2) output-line pattern for this mode.
    #[inline]
    pub const fn lines(self) -> (bool, bool) {
        match self {
            MicrostepMode::Full => (false, false),
            MicrostepMode::Half => (true, false),
            MicrostepMode::Quarter => (false, true),
            MicrostepMode::Sixteenth => (true, true),
        }
    }

    /// Recover the mode from (ms1, ms2) line states.
    #[inline]
    pub const fn from_lines(ms1: bool, ms2: bool) -> Self {
        match (ms1, ms2) {
            (false, false) => MicrostepMode::Full,
            (true, false) => MicrostepMode::Half,
            (false, true) => MicrostepMode::Quarter,
            (true, true) => MicrostepMode::Sixteenth,
        }
    }

    /// The step divisor this mode produces (1, 2, 4, or 16).
    #[inline]
    pub const fn divisor(self) -> u16 {
        match self {
            MicrostepMode::Full => 1,
            MicrostepMode::Half => 2,
            MicrostepMode::Quarter => 4,
            MicrostepMode::Sixteenth => 16,
        }
    }

    /// Look up the mode for a step divisor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrostepDivisor` for divisors the
    /// hardware cannot produce (anything but 1, 2, 4, 16).
    pub fn from_divisor(divisor: u16) -> Result<Self, ConfigError> {
        match divisor {
            1 => Ok(MicrostepMode::Full),
            2 => Ok(MicrostepMode::Half),
            4 => Ok(MicrostepMode::Quarter),
            16 => Ok(MicrostepMode::Sixteenth),
            other => Err(ConfigError::InvalidMicrostepDivisor(other)),
        }
    }
}

impl<'de> Deserialize<'de> for MicrostepMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let divisor = u16::deserialize(deserializer)?;
        MicrostepMode::from_divisor(divisor).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_number_roundtrip() {
        assert_eq!(Axis::from_number(1), Ok(Axis::One));
        assert_eq!(Axis::from_number(2), Ok(Axis::Two));
        assert_eq!(Axis::One.number(), 1);
        assert_eq!(Axis::Two.number(), 2);
    }

    #[test]
    fn test_axis_number_rejects_out_of_set() {
        assert_eq!(Axis::from_number(0), Err(AxisError::InvalidAxis(0)));
        assert_eq!(Axis::from_number(3), Err(AxisError::InvalidAxis(3)));
        assert_eq!(Axis::from_number(0xff), Err(AxisError::InvalidAxis(0xff)));
    }

    #[test]
    fn test_axis_set_membership() {
        assert!(AxisSet::ONE.contains(Axis::One));
        assert!(!AxisSet::ONE.contains(Axis::Two));
        assert!(AxisSet::BOTH.contains(Axis::One));
        assert!(AxisSet::BOTH.contains(Axis::Two));
        assert!(AxisSet::EMPTY.is_empty());
    }

    #[test]
    fn test_axis_set_rejects_stray_bits() {
        assert!(AxisSet::from_bits(0x03).is_ok());
        assert!(AxisSet::from_bits(0x00).is_ok());
        assert_eq!(AxisSet::from_bits(0x04), Err(AxisError::InvalidAxisSet(0x04)));
        assert_eq!(AxisSet::from_bits(0x80), Err(AxisError::InvalidAxisSet(0x80)));
    }

    #[test]
    fn test_axis_set_iter_order() {
        let axes: heapless::Vec<Axis, 2> = AxisSet::BOTH.iter().collect();
        assert_eq!(&axes[..], &[Axis::One, Axis::Two]);
    }

    #[test]
    fn test_direction_wire_roundtrip() {
        assert_eq!(Direction::from_wire(0x00), Ok(Direction::Low));
        assert_eq!(Direction::from_wire(0x01), Ok(Direction::High));
        assert_eq!(Direction::from_wire(0x02), Err(AxisError::InvalidDirection(0x02)));
        assert_eq!(Direction::High.wire(), 0x01);
    }

    #[test]
    fn test_microstep_wire_roundtrip() {
        for mode in MicrostepMode::ALL {
            assert_eq!(MicrostepMode::from_wire(mode.wire()), Ok(mode));
        }
        assert_eq!(MicrostepMode::from_wire(4), Err(AxisError::InvalidMicrosteps(4)));
    }

    #[test]
    fn test_microstep_line_mapping() {
        assert_eq!(MicrostepMode::Full.lines(), (false, false));
        assert_eq!(MicrostepMode::Half.lines(), (true, false));
        assert_eq!(MicrostepMode::Quarter.lines(), (false, true));
        assert_eq!(MicrostepMode::Sixteenth.lines(), (true, true));

        for mode in MicrostepMode::ALL {
            let (ms1, ms2) = mode.lines();
            assert_eq!(MicrostepMode::from_lines(ms1, ms2), mode);
        }
    }

    #[test]
    fn test_microstep_divisors() {
        assert_eq!(MicrostepMode::from_divisor(1), Ok(MicrostepMode::Full));
        assert_eq!(MicrostepMode::from_divisor(16), Ok(MicrostepMode::Sixteenth));
        assert!(MicrostepMode::from_divisor(8).is_err());
        assert!(MicrostepMode::from_divisor(0).is_err());
        assert!(MicrostepMode::from_divisor(32).is_err());
    }
}
