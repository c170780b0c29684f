//! Command protocol: wire constants, framing, and dispatch.

mod parser;
pub mod wire;

pub use parser::CommandPort;
pub use wire::{
    Opcode, END1_TOKEN, END2_TOKEN, MAX_FRAME_LEN, PROTOCOL_VERSION, RESPONSE_FILL, START_TOKEN,
    STATUS_FAIL, STATUS_SUCCESS,
};
