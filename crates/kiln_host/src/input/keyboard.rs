//! Keyboard as a controller.

use kiln_core::{Button, ControllerState};

/// Keys the host reacts to. Platforms map their native codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Z: face button A.
    Z,
    /// X: face button B.
    X,
    /// A: face button X.
    A,
    /// S: face button Y.
    S,
    /// Q: left shoulder.
    Q,
    /// W: right shoulder.
    W,
    /// E: left trigger.
    E,
    /// D: right trigger.
    D,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Escape: start.
    Escape,
    /// Tab: select.
    Tab,
    /// R: restart the game (host command).
    R,
    /// F1: quit (host command).
    F1,
}

impl Key {
    /// The controller button this key drives, if it is a plain button.
    #[must_use]
    pub const fn button(self) -> Option<Button> {
        match self {
            Key::Z => Some(Button::A),
            Key::X => Some(Button::B),
            Key::A => Some(Button::X),
            Key::S => Some(Button::Y),
            Key::Q => Some(Button::LeftShoulder),
            Key::W => Some(Button::RightShoulder),
            Key::E => Some(Button::LeftTrigger),
            Key::D => Some(Button::RightTrigger),
            Key::Escape => Some(Button::Start),
            Key::Tab => Some(Button::Select),
            _ => None,
        }
    }
}

/// Keyboard controller state, updated from discrete key events.
#[derive(Debug, Clone, Default)]
pub struct KeyboardDevice {
    previous: ControllerState,
    current: ControllerState,
}

impl KeyboardDevice {
    /// Creates a keyboard at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current state as the previous one. Call before
    /// feeding the frame's key events.
    pub fn begin_frame(&mut self) {
        self.previous = self.current;
    }

    /// State before this frame's events.
    #[must_use]
    pub const fn previous(&self) -> &ControllerState {
        &self.previous
    }

    /// State after this frame's events.
    #[must_use]
    pub const fn current(&self) -> &ControllerState {
        &self.current
    }

    /// Applies one key press or release.
    ///
    /// Arrows drive the left stick. Releasing an arrow only recenters the
    /// axis if it still points that way, so a quick left-right roll keeps
    /// the newer direction. Host command keys are ignored here.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if let Some(button) = key.button() {
            self.current.set_button(button, pressed);
            return;
        }

        let state = &mut self.current;
        match key {
            Key::Left => press_axis(&mut state.left_x, -1.0, pressed),
            Key::Right => press_axis(&mut state.left_x, 1.0, pressed),
            Key::Down => press_axis(&mut state.left_y, -1.0, pressed),
            Key::Up => press_axis(&mut state.left_y, 1.0, pressed),
            _ => {}
        }
    }
}

fn press_axis(axis: &mut f32, direction: f32, pressed: bool) {
    if pressed {
        *axis = direction;
    } else if *axis * direction > 0.0 {
        *axis = 0.0;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_button_keys() {
        let mut keyboard = KeyboardDevice::new();
        keyboard.handle_key(Key::Z, true);
        keyboard.handle_key(Key::Escape, true);
        keyboard.handle_key(Key::D, true);
        assert!(keyboard.current().button(Button::A));
        assert!(keyboard.current().button(Button::Start));
        assert!(keyboard.current().button(Button::RightTrigger));

        keyboard.handle_key(Key::Z, false);
        assert!(!keyboard.current().button(Button::A));
    }

    #[test]
    fn test_release_only_recenters_matching_direction() {
        let mut keyboard = KeyboardDevice::new();
        keyboard.handle_key(Key::Left, true);
        keyboard.handle_key(Key::Right, true);
        assert_eq!(keyboard.current().left_x, 1.0);

        // Left is released while Right is the active direction.
        keyboard.handle_key(Key::Left, false);
        assert_eq!(keyboard.current().left_x, 1.0);

        keyboard.handle_key(Key::Right, false);
        assert_eq!(keyboard.current().left_x, 0.0);
    }

    #[test]
    fn test_up_is_positive_y() {
        let mut keyboard = KeyboardDevice::new();
        keyboard.handle_key(Key::Up, true);
        assert_eq!(keyboard.current().left_y, 1.0);
        keyboard.handle_key(Key::Down, true);
        assert_eq!(keyboard.current().left_y, -1.0);
    }

    #[test]
    fn test_command_keys_leave_state_alone() {
        let mut keyboard = KeyboardDevice::new();
        keyboard.handle_key(Key::R, true);
        keyboard.handle_key(Key::F1, true);
        assert_eq!(*keyboard.current(), ControllerState::NEUTRAL);
    }

    #[test]
    fn test_begin_frame_snapshots() {
        let mut keyboard = KeyboardDevice::new();
        keyboard.handle_key(Key::X, true);
        keyboard.begin_frame();
        keyboard.handle_key(Key::X, false);
        assert!(keyboard.previous().button(Button::B));
        assert!(!keyboard.current().button(Button::B));
    }
}
