//! # Controller Input
//!
//! The single logical controller handed to game logic every tick, and the
//! rules for folding several physical devices into it.

mod axis;
mod controller;

pub use axis::{
    digital_axis, map_axis_value, map_trigger_value, AXIS_MAX_VALUE, AXIS_MIN_VALUE,
    DEAD_ZONE_RANGE,
};
pub use controller::{Button, ControllerSnapshot, ControllerState};
