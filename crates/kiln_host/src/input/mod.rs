//! # Input Devices
//!
//! Each physical source keeps its own controller state. Once per frame the
//! [`InputMerger`] folds whatever changed on each source into the combined
//! controller the plugin sees, keyboard first and gamepad second.

mod gamepad;
mod keyboard;
mod merge;

pub use gamepad::{unit_to_raw, GamepadAxis, GamepadButton, GamepadDevice, GamepadSample};
pub use keyboard::{Key, KeyboardDevice};
pub use merge::InputMerger;
