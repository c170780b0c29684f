//! # dualstep
//!
//! Dual-axis stepper controller core with embedded-hal 1.0 support: a
//! tick-driven step generator and a framed binary command protocol.
//!
//! ## Features
//!
//! - **Split-ownership engine**: the periodic tick handler and the main
//!   loop each own their half of the hardware, sharing only single-word
//!   atomics
//! - **Relay safety interlocks**: counted moves can stop early, or run
//!   until a limit-relay pair trips
//! - **Tick-synchronized arm/disarm**: starting or stopping both axes in
//!   one command aligns their pulse trains to the same tick
//! - **Framed binary protocol**: fixed per-opcode frame lengths, silent
//!   drop of malformed input, poison-filled responses
//! - **embedded-hal 1.0**: `OutputPin` for STEP, `StatefulOutputPin` for
//!   latched configuration outputs
//! - **no_std compatible**: core library works without the standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dualstep::{AxisController, CommandPort, SharedState, StepGenerator};
//!
//! static SHARED: SharedState = SharedState::new();
//!
//! // Tick context: call from the 100 µs timer interrupt.
//! let mut generator = StepGenerator::new(&SHARED, step1_pin, step2_pin, relays);
//!
//! // Main loop: decode and answer commands forever.
//! let controller = AxisController::new(&SHARED, axis1_io, axis2_io, relays)?;
//! let mut port = CommandPort::new(uart, activity_led, controller);
//! loop {
//!     let _ = port.poll();
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing for the
//!   configuration layer
//! - `defmt`: Derives `defmt::Format` on wire and engine types for
//!   embedded logging

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod hal;
pub mod protocol;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisDefaults, ControllerConfig};
pub use engine::{
    Axis, AxisBackend, AxisController, AxisSet, Direction, GpioAxis, MicrostepMode, SharedState,
    StepGenerator,
};
pub use error::{AxisError, ConfigError, Error, FrameError, Result};
pub use hal::{ByteTransport, CurrentDac, RelayBank, RelayStatus};
pub use protocol::{CommandPort, Opcode};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Device limits and timing constants
pub use engine::{
    CURRENT_MAX, CURRENT_MIN, STEP_DELAY_DEFAULT, STEP_DELAY_INVALID, STEP_DELAY_MIN,
    TICK_PERIOD_US,
};
