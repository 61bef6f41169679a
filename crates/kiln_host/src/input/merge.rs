//! Folding the input devices into one controller.

use kiln_core::ControllerState;

use super::gamepad::{GamepadDevice, GamepadSample};
use super::keyboard::{Key, KeyboardDevice};

/// Keyboard, gamepad and the combined controller derived from them.
#[derive(Debug, Clone, Default)]
pub struct InputMerger {
    keyboard: KeyboardDevice,
    gamepad: GamepadDevice,
    combined: ControllerState,
}

impl InputMerger {
    /// Creates a merger with every source at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: snapshots the keyboard before its events arrive.
    pub fn begin_frame(&mut self) {
        self.keyboard.begin_frame();
    }

    /// Feeds one key event to the keyboard.
    pub fn key(&mut self, key: Key, pressed: bool) {
        self.keyboard.handle_key(key, pressed);
    }

    /// Samples the gamepad and merges both sources into the combined
    /// state, keyboard first so gamepad changes win conflicts.
    pub fn finish_frame(&mut self, gamepad: Option<&GamepadSample>) -> &ControllerState {
        self.gamepad.sample(gamepad);

        self.combined
            .apply_differences(self.keyboard.previous(), self.keyboard.current());
        self.combined
            .apply_differences(self.gamepad.previous(), self.gamepad.current());

        tracing::trace!(combined = ?self.combined, "input merged");
        &self.combined
    }

    /// The controller handed to game logic.
    #[must_use]
    pub const fn combined(&self) -> &ControllerState {
        &self.combined
    }

    /// The keyboard source.
    #[must_use]
    pub const fn keyboard(&self) -> &KeyboardDevice {
        &self.keyboard
    }

    /// The gamepad source.
    #[must_use]
    pub const fn gamepad(&self) -> &GamepadDevice {
        &self.gamepad
    }
}
