//! Capability interfaces for the hardware this core drives but does not own.
//!
//! The byte transport, the limit-relay bank, and the per-axis drive-current
//! DAC are collaborator contracts: board crates implement them over the real
//! peripherals, tests implement them over plain cells. GPIO outputs use the
//! `embedded-hal` pin traits directly and are not redeclared here.

use crate::engine::Axis;

/// Blocking byte-stream transport (typically a UART).
///
/// `recv` and `send` block until a byte is transferred; there is no internal
/// timeout. Transport-level faults are expected to be handled below this
/// interface, which is why both directions are infallible.
pub trait ByteTransport {
    /// Receive one byte, blocking until one is available.
    fn recv(&mut self) -> u8;

    /// Send one byte, blocking until the transport accepts it.
    fn send(&mut self, byte: u8);

    /// Whether a byte can currently be received without blocking.
    fn available(&self) -> bool;
}

/// Raw relay-contact states, one bit per contact.
///
/// Bit layout matches the wire format of the relay-status query: a set bit
/// means the contact reads engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayStatus(u8);

impl RelayStatus {
    /// Axis 1, contact A.
    pub const R1_A: u8 = 0x01;
    /// Axis 1, contact B.
    pub const R1_B: u8 = 0x02;
    /// Axis 2, contact A.
    pub const R2_A: u8 = 0x04;
    /// Axis 2, contact B.
    pub const R2_B: u8 = 0x08;
    /// All valid contact bits.
    pub const MASK: u8 = 0x0f;

    /// Build a status from raw contact bits; bits outside [`Self::MASK`] are dropped.
    #[inline]
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw contact bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The two contact bits belonging to an axis's relay pair.
    #[inline]
    pub const fn pair_bits(axis: Axis) -> u8 {
        match axis {
            Axis::One => Self::R1_A | Self::R1_B,
            Axis::Two => Self::R2_A | Self::R2_B,
        }
    }

    /// True when either contact of the axis's pair reads engaged.
    ///
    /// A pair counts as triggered unless both of its contacts read open.
    #[inline]
    pub const fn pair_triggered(self, axis: Axis) -> bool {
        self.0 & Self::pair_bits(axis) != 0
    }
}

/// Limit-relay bank: two contact pairs, one per axis.
///
/// Methods take `&self` because the bank is read from both the tick context
/// and the main loop; implementations are typically zero-sized register
/// readers or shared cells.
pub trait RelayBank {
    /// Read all four contact states at once.
    fn contacts(&self) -> RelayStatus;

    /// Whether the axis's relay pair currently reports triggered.
    #[inline]
    fn pair_triggered(&self, axis: Axis) -> bool {
        self.contacts().pair_triggered(axis)
    }
}

impl<T: RelayBank + ?Sized> RelayBank for &T {
    #[inline]
    fn contacts(&self) -> RelayStatus {
        (**self).contacts()
    }
}

/// Per-axis drive-current DAC channel.
///
/// The channel's data register is the state of record: `raw` reads back
/// whatever was last written, so no software shadow copy is kept.
pub trait CurrentDac {
    /// Write a raw current value. The caller guarantees it is within range.
    fn set(&mut self, raw: u16);

    /// Read back the last written raw value.
    fn raw(&self) -> u16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_masks_unknown_bits() {
        let status = RelayStatus::new(0xf5);
        assert_eq!(status.bits(), 0x05);
    }

    #[test]
    fn test_pair_triggered_per_axis() {
        let status = RelayStatus::new(RelayStatus::R1_B);
        assert!(status.pair_triggered(Axis::One));
        assert!(!status.pair_triggered(Axis::Two));

        let status = RelayStatus::new(RelayStatus::R2_A | RelayStatus::R2_B);
        assert!(!status.pair_triggered(Axis::One));
        assert!(status.pair_triggered(Axis::Two));
    }

    #[test]
    fn test_both_contacts_open_is_not_triggered() {
        let status = RelayStatus::new(0);
        assert!(!status.pair_triggered(Axis::One));
        assert!(!status.pair_triggered(Axis::Two));
    }
}
