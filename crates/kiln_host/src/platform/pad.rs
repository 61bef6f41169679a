//! Gamepad reading for the desktop backend, through gilrs.
//!
//! One pad is followed at a time: the first one seen. When it disconnects
//! the reader moves to any other connected pad, or reports none until a
//! new one is plugged in.

use gilrs::{Axis, Button, EventType, Gamepad, GamepadId, Gilrs};

use crate::input::{unit_to_raw, GamepadAxis, GamepadButton, GamepadSample};

const BUTTON_MAP: [(Button, GamepadButton); 14] = [
    (Button::South, GamepadButton::A),
    (Button::East, GamepadButton::B),
    (Button::West, GamepadButton::X),
    (Button::North, GamepadButton::Y),
    (Button::Select, GamepadButton::Back),
    (Button::Start, GamepadButton::Start),
    (Button::LeftTrigger, GamepadButton::LeftShoulder),
    (Button::RightTrigger, GamepadButton::RightShoulder),
    (Button::LeftThumb, GamepadButton::LeftStick),
    (Button::RightThumb, GamepadButton::RightStick),
    (Button::DPadUp, GamepadButton::DPadUp),
    (Button::DPadDown, GamepadButton::DPadDown),
    (Button::DPadLeft, GamepadButton::DPadLeft),
    (Button::DPadRight, GamepadButton::DPadRight),
];

/// Follows one connected gamepad across hotplug events.
pub(super) struct PadReader {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
}

impl PadReader {
    /// Starts listening. Without gamepad support the reader reports no pad.
    pub(super) fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(gilrs::Error::NotImplemented(fallback)) => {
                tracing::warn!("gamepads are not supported on this platform");
                Some(fallback)
            }
            Err(error) => {
                tracing::warn!(%error, "gamepad input unavailable");
                None
            }
        };
        let active = gilrs
            .as_ref()
            .and_then(|gilrs| gilrs.gamepads().next().map(|(id, _)| id));
        if let (Some(gilrs), Some(id)) = (gilrs.as_ref(), active) {
            tracing::info!(name = gilrs.gamepad(id).name(), "gamepad connected");
        }
        Self { gilrs, active }
    }

    /// Drains hotplug events and reads the followed pad.
    pub(super) fn sample(&mut self) -> Option<GamepadSample> {
        let gilrs = self.gilrs.as_mut()?;
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected if self.active.is_none() => {
                    self.active = Some(event.id);
                    tracing::info!(name = gilrs.gamepad(event.id).name(), "gamepad connected");
                }
                EventType::Disconnected if self.active == Some(event.id) => {
                    self.active = gilrs
                        .gamepads()
                        .map(|(id, _)| id)
                        .find(|id| *id != event.id);
                    tracing::info!(fallback = self.active.is_some(), "gamepad disconnected");
                }
                _ => {}
            }
        }

        let pad = gilrs.gamepad(self.active?);
        pad.is_connected().then(|| read(&pad))
    }
}

/// gilrs reports stick Y up-positive; raw readings are down-positive.
fn read(pad: &Gamepad<'_>) -> GamepadSample {
    let trigger = |button| pad.button_data(button).map_or(0.0, |data| data.value());
    let mut sample = GamepadSample::default()
        .with_axis(GamepadAxis::LeftX, unit_to_raw(pad.value(Axis::LeftStickX)))
        .with_axis(GamepadAxis::LeftY, unit_to_raw(-pad.value(Axis::LeftStickY)))
        .with_axis(GamepadAxis::RightX, unit_to_raw(pad.value(Axis::RightStickX)))
        .with_axis(GamepadAxis::RightY, unit_to_raw(-pad.value(Axis::RightStickY)))
        .with_axis(GamepadAxis::TriggerLeft, unit_to_raw(trigger(Button::LeftTrigger2)))
        .with_axis(GamepadAxis::TriggerRight, unit_to_raw(trigger(Button::RightTrigger2)));
    for (source, target) in BUTTON_MAP {
        if pad.is_pressed(source) {
            sample = sample.with_button(target);
        }
    }
    sample
}
