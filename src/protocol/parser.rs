//! Blocking frame parser and command dispatcher.
//!
//! Runs in the main control loop: block for one frame, decode it, call into
//! the engine, answer. Malformed input is dropped without a response — with
//! no delimiter escaping on the wire, the only trustworthy
//! resynchronization point is the next start token.

use embedded_hal::digital::StatefulOutputPin;

use crate::engine::{Axis, AxisBackend, AxisController, AxisSet, Direction, MicrostepMode};
use crate::error::{AxisError, FrameError};
use crate::hal::{ByteTransport, RelayBank};

use super::wire::{
    Opcode, END1_TOKEN, END2_TOKEN, MAX_FRAME_LEN, PROTOCOL_VERSION, RESPONSE_FILL, START_TOKEN,
    STATUS_FAIL, STATUS_SUCCESS,
};

/// The command port: transport, activity indicator, and the controller the
/// decoded commands act on.
///
/// Framing states run `AwaitStart → AwaitOpcode → AwaitPayload → AwaitEnd1
/// → AwaitEnd2 → Dispatch`; each [`poll`](Self::poll) call walks the whole
/// sequence for one frame, blocking on the transport between bytes.
pub struct CommandPort<'a, T, L, A1, A2, R> {
    transport: T,
    indicator: L,
    controller: AxisController<'a, A1, A2, R>,
}

impl<'a, T, L, A1, A2, R> CommandPort<'a, T, L, A1, A2, R>
where
    T: ByteTransport,
    L: StatefulOutputPin,
    A1: AxisBackend,
    A2: AxisBackend,
    R: RelayBank,
{
    /// Create a port over a transport, an activity indicator, and the
    /// controller half of the engine.
    pub fn new(transport: T, indicator: L, controller: AxisController<'a, A1, A2, R>) -> Self {
        Self {
            transport,
            indicator,
            controller,
        }
    }

    /// Access the controller, e.g. for host-side configuration replay.
    pub fn controller_mut(&mut self) -> &mut AxisController<'a, A1, A2, R> {
        &mut self.controller
    }

    /// Whether a byte is waiting on the transport.
    pub fn rx_pending(&self) -> bool {
        self.transport.available()
    }

    /// Receive, dispatch, and answer one frame.
    ///
    /// Blocks until a full frame arrives or framing fails. On success the
    /// handled opcode is returned and exactly one response frame has been
    /// sent — a `fail` status response still counts as success here, since
    /// the frame itself was well-formed.
    ///
    /// # Errors
    ///
    /// A [`FrameError`] means the partial frame was dropped silently; no
    /// response was sent and the parser is back at `AwaitStart`.
    pub fn poll(&mut self) -> Result<Opcode, FrameError> {
        // AwaitStart
        let byte = self.transport.recv();
        if byte != START_TOKEN {
            return Err(FrameError::BadStartToken(byte));
        }

        // AwaitOpcode: an unknown opcode has no table entry, so the frame
        // cannot even be sized; abort.
        let byte = self.transport.recv();
        let opcode = Opcode::from_wire(byte).ok_or(FrameError::UnknownOpcode(byte))?;

        // AwaitPayload
        let mut payload = [0u8; MAX_FRAME_LEN];
        let payload_len = opcode.request_payload_len();
        for slot in &mut payload[..payload_len] {
            *slot = self.transport.recv();
        }

        // AwaitEnd1 / AwaitEnd2
        for expected in [END1_TOKEN, END2_TOKEN] {
            let byte = self.transport.recv();
            if byte != expected {
                return Err(FrameError::BadEndToken {
                    expected,
                    found: byte,
                });
            }
        }

        // One indicator pulse per well-formed frame, whatever the outcome.
        let _ = self.indicator.toggle();

        self.dispatch(opcode, &payload[..payload_len]);
        Ok(opcode)
    }

    /// Decode the payload, run the operation, and send the response frame.
    fn dispatch(&mut self, opcode: Opcode, payload: &[u8]) {
        let mut resp = [RESPONSE_FILL; MAX_FRAME_LEN];
        resp[0] = START_TOKEN;
        resp[1] = opcode.wire();
        resp[2] = STATUS_SUCCESS;

        let controller = &mut self.controller;
        let result: Result<(), AxisError> = match opcode {
            Opcode::SetSteps => Axis::from_number(payload[0])
                .and_then(|axis| controller.set_steps(axis, u32_at(payload, 1))),
            Opcode::SetSafeSteps => Axis::from_number(payload[0])
                .and_then(|axis| controller.set_safe_steps(axis, u32_at(payload, 1))),
            Opcode::SetSeekUntilRelay => {
                Axis::from_number(payload[0]).and_then(|axis| controller.set_seek_until_relay(axis))
            }
            Opcode::Start => AxisSet::from_bits(payload[0]).and_then(|axes| controller.start(axes)),
            Opcode::Stop => AxisSet::from_bits(payload[0]).map(|axes| controller.stop(axes)),
            Opcode::GetMoving => Axis::from_number(payload[0]).map(|axis| {
                resp[3] = controller.is_moving(axis) as u8;
            }),
            Opcode::SetEnable => Axis::from_number(payload[0]).and_then(|axis| {
                let enabled = decode_enable(payload[1])?;
                controller.set_enabled(axis, enabled)
            }),
            Opcode::GetEnable => Axis::from_number(payload[0]).and_then(|axis| {
                let enabled = controller.is_enabled(axis)?;
                resp[3] = enabled as u8;
                Ok(())
            }),
            Opcode::SetMicrosteps => Axis::from_number(payload[0]).and_then(|axis| {
                let mode = MicrostepMode::from_wire(payload[1])?;
                controller.set_microsteps(axis, mode)
            }),
            Opcode::GetMicrosteps => Axis::from_number(payload[0]).and_then(|axis| {
                let mode = controller.microsteps(axis)?;
                resp[3] = mode.wire();
                Ok(())
            }),
            Opcode::SetDirection => Axis::from_number(payload[0]).and_then(|axis| {
                let direction = Direction::from_wire(payload[1])?;
                controller.set_direction(axis, direction)
            }),
            Opcode::GetDirection => Axis::from_number(payload[0]).and_then(|axis| {
                let direction = controller.direction(axis)?;
                resp[3] = direction.wire();
                Ok(())
            }),
            Opcode::SetCurrent => Axis::from_number(payload[0])
                .and_then(|axis| controller.set_current(axis, u16_at(payload, 1))),
            Opcode::GetCurrent => Axis::from_number(payload[0]).map(|axis| {
                resp[3..5].copy_from_slice(&controller.current(axis).to_le_bytes());
            }),
            Opcode::SetStepDelay => Axis::from_number(payload[0])
                .and_then(|axis| controller.set_step_delay(axis, u16_at(payload, 1))),
            Opcode::GetStepDelay => Axis::from_number(payload[0]).map(|axis| {
                resp[3..5].copy_from_slice(&controller.step_delay(axis).to_le_bytes());
            }),
            Opcode::GetRelayStatus => {
                resp[3] = controller.relay_status().bits();
                Ok(())
            }
            Opcode::GetVersion => {
                resp[3] = PROTOCOL_VERSION;
                Ok(())
            }
        };

        if result.is_err() {
            resp[2] = STATUS_FAIL;
        }

        let len = opcode.response_len();
        resp[len - 2] = END1_TOKEN;
        resp[len - 1] = END2_TOKEN;
        for &byte in &resp[..len] {
            self.transport.send(byte);
        }
    }
}

fn decode_enable(byte: u8) -> Result<bool, AxisError> {
    match byte {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => Err(AxisError::InvalidEnable(other)),
    }
}

#[inline]
fn u16_at(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

#[inline]
fn u32_at(payload: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}
