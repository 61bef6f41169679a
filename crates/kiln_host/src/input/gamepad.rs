//! Gamepad sampling.

use kiln_core::{digital_axis, map_axis_value, map_trigger_value, Button, ControllerState};

/// Analog axes of a standard gamepad, in raw signed 16-bit units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum GamepadAxis {
    /// Left stick, positive right.
    LeftX,
    /// Left stick, positive down.
    LeftY,
    /// Right stick, positive right.
    RightX,
    /// Right stick, as reported.
    RightY,
    /// Left trigger travel.
    TriggerLeft,
    /// Right trigger travel.
    TriggerRight,
}

/// Digital buttons of a standard gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum GamepadButton {
    /// Bottom face button.
    A = 1 << 0,
    /// Right face button.
    B = 1 << 1,
    /// Left face button.
    X = 1 << 2,
    /// Top face button.
    Y = 1 << 3,
    /// Back / view.
    Back = 1 << 4,
    /// Start / menu.
    Start = 1 << 5,
    /// Left bumper.
    LeftShoulder = 1 << 6,
    /// Right bumper.
    RightShoulder = 1 << 7,
    /// Left stick click.
    LeftStick = 1 << 8,
    /// Right stick click.
    RightStick = 1 << 9,
    /// D-pad up.
    DPadUp = 1 << 10,
    /// D-pad down.
    DPadDown = 1 << 11,
    /// D-pad left.
    DPadLeft = 1 << 12,
    /// D-pad right.
    DPadRight = 1 << 13,
}

/// Direct button mappings. Triggers and the d-pad are handled separately.
const BUTTON_MAP: [(GamepadButton, Button); 10] = [
    (GamepadButton::A, Button::A),
    (GamepadButton::B, Button::B),
    (GamepadButton::X, Button::X),
    (GamepadButton::Y, Button::Y),
    (GamepadButton::Back, Button::Select),
    (GamepadButton::Start, Button::Start),
    (GamepadButton::LeftShoulder, Button::LeftShoulder),
    (GamepadButton::RightShoulder, Button::RightShoulder),
    (GamepadButton::LeftStick, Button::LeftStick),
    (GamepadButton::RightStick, Button::RightStick),
];

/// Converts a normalized reading in `[-1, 1]` to raw axis units.
///
/// Out-of-range input is clamped; NaN reads as centered.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn unit_to_raw(value: f32) -> i16 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

/// One raw reading of a connected gamepad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadSample {
    /// Raw axis values indexed by [`GamepadAxis`].
    pub axes: [i16; 6],
    /// Held buttons, one bit per [`GamepadButton`].
    pub buttons: u16,
}

impl GamepadSample {
    /// Sets one raw axis value.
    #[must_use]
    pub fn with_axis(mut self, axis: GamepadAxis, value: i16) -> Self {
        self.axes[axis as usize] = value;
        self
    }

    /// Marks one button held.
    #[must_use]
    pub fn with_button(mut self, button: GamepadButton) -> Self {
        self.buttons |= button as u16;
        self
    }

    /// Raw value of one axis.
    #[must_use]
    pub const fn axis(&self, axis: GamepadAxis) -> i16 {
        self.axes[axis as usize]
    }

    /// True if `button` is held.
    #[must_use]
    pub const fn button(&self, button: GamepadButton) -> bool {
        self.buttons & button as u16 != 0
    }

    /// Converts the raw reading into controller state.
    ///
    /// Left Y is inverted so up is positive. The d-pad drives the left
    /// stick only while the analog reading on that axis is exactly zero.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn to_controller(&self) -> ControllerState {
        let mut state = ControllerState {
            left_x: map_axis_value(self.axis(GamepadAxis::LeftX)),
            left_y: -map_axis_value(self.axis(GamepadAxis::LeftY)),
            right_x: map_axis_value(self.axis(GamepadAxis::RightX)),
            right_y: map_axis_value(self.axis(GamepadAxis::RightY)),
            buttons: 0,
        };

        if state.left_x == 0.0 {
            state.left_x = digital_axis(
                self.button(GamepadButton::DPadLeft),
                self.button(GamepadButton::DPadRight),
            );
        }
        if state.left_y == 0.0 {
            state.left_y = digital_axis(
                self.button(GamepadButton::DPadDown),
                self.button(GamepadButton::DPadUp),
            );
        }

        for (source, target) in BUTTON_MAP {
            state.set_button(target, self.button(source));
        }
        state.set_button(
            Button::LeftTrigger,
            map_trigger_value(self.axis(GamepadAxis::TriggerLeft)),
        );
        state.set_button(
            Button::RightTrigger,
            map_trigger_value(self.axis(GamepadAxis::TriggerRight)),
        );
        state
    }
}

/// Gamepad controller state, resampled every frame.
#[derive(Debug, Clone, Default)]
pub struct GamepadDevice {
    previous: ControllerState,
    current: ControllerState,
}

impl GamepadDevice {
    /// Creates a gamepad at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the previous state and takes a new reading.
    ///
    /// With no pad connected the state is held, so nothing propagates.
    pub fn sample(&mut self, reading: Option<&GamepadSample>) {
        self.previous = self.current;
        if let Some(reading) = reading {
            self.current = reading.to_controller();
        }
    }

    /// State before the latest sample.
    #[must_use]
    pub const fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// Latest sampled state.
    #[must_use]
    pub const fn current(&self) -> &ControllerState {
        &self.current
    }
}
