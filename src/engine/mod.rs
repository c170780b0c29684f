//! Stepper motion engine.
//!
//! Split-ownership design: a [`SharedState`] arena of single-word atomics
//! sits between the [`StepGenerator`] (owned by the periodic tick context)
//! and the [`AxisController`] (owned by the main loop). The contract that
//! makes the split sound: setters refuse to touch a running axis, so each
//! context writes only fields the other is not writing.

mod axis;
mod backend;
mod controller;
mod generator;
mod shared;

pub use axis::{Axis, AxisSet, Direction, MicrostepMode};
pub use axis::{
    CURRENT_MAX, CURRENT_MIN, STEP_DELAY_DEFAULT, STEP_DELAY_INVALID, STEP_DELAY_MIN,
    TICK_PERIOD_US,
};
pub use backend::{AxisBackend, GpioAxis};
pub use controller::AxisController;
pub use generator::StepGenerator;
pub use shared::SharedState;
