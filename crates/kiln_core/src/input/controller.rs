//! Controller state value type and the delta/merge protocol.

use bytemuck::{Pod, Zeroable};

/// A digital button on the logical controller.
///
/// Discriminants are the bit each button occupies in
/// [`ControllerState::buttons`]. Bit 0 is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Button {
    /// Face button A (bottom).
    A = 1 << 1,
    /// Face button B (right).
    B = 1 << 2,
    /// Face button X (left).
    X = 1 << 3,
    /// Face button Y (top).
    Y = 1 << 4,
    /// Select / back.
    Select = 1 << 5,
    /// Start / pause.
    Start = 1 << 6,
    /// Left shoulder bumper.
    LeftShoulder = 1 << 7,
    /// Right shoulder bumper.
    RightShoulder = 1 << 8,
    /// Left trigger, digitized.
    LeftTrigger = 1 << 9,
    /// Right trigger, digitized.
    RightTrigger = 1 << 10,
    /// Left stick click.
    LeftStick = 1 << 11,
    /// Right stick click.
    RightStick = 1 << 12,
}

impl Button {
    /// Every button, in bit order.
    pub const ALL: [Button; 12] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Select,
        Button::Start,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::LeftTrigger,
        Button::RightTrigger,
        Button::LeftStick,
        Button::RightStick,
    ];

    /// The bit this button occupies in the mask.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u32 {
        self as u32
    }
}

/// The state of one logical controller.
///
/// Plain old data: it is copied into the persistent arena by game logic, so
/// its layout is part of the plugin ABI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ControllerState {
    /// Left stick X in [-1, 1], positive right.
    pub left_x: f32,
    /// Left stick Y in [-1, 1], positive up.
    pub left_y: f32,
    /// Right stick X in [-1, 1].
    pub right_x: f32,
    /// Right stick Y in [-1, 1].
    pub right_y: f32,
    /// Pressed buttons, one bit per [`Button`].
    pub buttons: u32,
}

impl ControllerState {
    /// A controller at rest: centered sticks, nothing pressed.
    pub const NEUTRAL: Self = Self {
        left_x: 0.0,
        left_y: 0.0,
        right_x: 0.0,
        right_y: 0.0,
        buttons: 0,
    };

    /// Sets or clears one button, leaving the others alone.
    #[inline]
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
    }

    /// Returns whether `button` is held.
    #[inline]
    #[must_use]
    pub const fn button(&self, button: Button) -> bool {
        self.buttons & button.mask() != 0
    }

    /// The four axes in declaration order.
    #[inline]
    #[must_use]
    pub const fn axes(&self) -> [f32; 4] {
        [self.left_x, self.left_y, self.right_x, self.right_y]
    }

    fn axes_mut(&mut self) -> [&mut f32; 4] {
        [
            &mut self.left_x,
            &mut self.left_y,
            &mut self.right_x,
            &mut self.right_y,
        ]
    }

    /// Overlays the fields that changed between `old` and `new` onto `self`.
    ///
    /// Each axis is copied verbatim when it differs; each button is copied
    /// when its pressed state flipped. Fields that did not change keep the
    /// value `self` already had, so an idle source never stomps on an
    /// active one. Applying two sources in sequence lets the later one win
    /// on fields both changed.
    #[allow(clippy::float_cmp)]
    pub fn apply_differences(&mut self, old: &ControllerState, new: &ControllerState) {
        let old_axes = old.axes();
        let new_axes = new.axes();
        for ((axis, before), after) in self.axes_mut().into_iter().zip(old_axes).zip(new_axes) {
            if before != after {
                *axis = after;
            }
        }

        for button in Button::ALL {
            let pressed = new.button(button);
            if old.button(button) != pressed {
                self.set_button(button, pressed);
            }
        }
    }
}

/// The previous and current controller states, for edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ControllerSnapshot {
    /// State seen on the previous tick.
    pub previous: ControllerState,
    /// State seen on this tick.
    pub current: ControllerState,
}

impl ControllerSnapshot {
    /// Shifts `current` into `previous` and records `next`.
    #[inline]
    pub fn advance(&mut self, next: &ControllerState) {
        self.previous = self.current;
        self.current = *next;
    }

    /// True on the tick `button` goes down.
    #[inline]
    #[must_use]
    pub const fn pressed(&self, button: Button) -> bool {
        self.current.button(button) && !self.previous.button(button)
    }

    /// True on the tick `button` comes up.
    #[inline]
    #[must_use]
    pub const fn released(&self, button: Button) -> bool {
        !self.current.button(button) && self.previous.button(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_button_masks_are_independent() {
        let mut seen = 0u32;
        for button in Button::ALL {
            assert_eq!(button.mask().count_ones(), 1);
            assert_eq!(seen & button.mask(), 0);
            seen |= button.mask();
        }
        assert_eq!(seen & 1, 0);
    }

    #[test]
    fn test_set_button_touches_one_bit() {
        let mut state = ControllerState::default();
        state.set_button(Button::A, true);
        state.set_button(Button::Start, true);
        state.set_button(Button::A, false);
        assert!(!state.button(Button::A));
        assert!(state.button(Button::Start));
        assert_eq!(state.buttons, Button::Start.mask());
    }

    #[test]
    fn test_unchanged_source_does_not_stomp() {
        let mut combined = ControllerState::default();
        let keyboard_old = ControllerState::default();
        let mut keyboard_new = keyboard_old;
        keyboard_new.left_x = -1.0;
        keyboard_new.set_button(Button::A, true);

        // Gamepad sits idle at zero the whole time.
        let idle = ControllerState::default();

        combined.apply_differences(&keyboard_old, &keyboard_new);
        combined.apply_differences(&idle, &idle);

        assert_eq!(combined.left_x, -1.0);
        assert!(combined.button(Button::A));
    }

    #[test]
    fn test_later_source_wins_on_conflict() {
        let mut combined = ControllerState::default();
        let rest = ControllerState::default();

        let mut keyboard = rest;
        keyboard.left_x = -1.0;
        keyboard.set_button(Button::B, true);

        let mut gamepad = rest;
        gamepad.left_x = 0.5;
        gamepad.set_button(Button::B, false);
        gamepad.set_button(Button::Y, true);

        combined.apply_differences(&rest, &keyboard);
        combined.apply_differences(&rest, &gamepad);

        assert_eq!(combined.left_x, 0.5);
        // Gamepad never changed B, so the keyboard press stands.
        assert!(combined.button(Button::B));
        assert!(combined.button(Button::Y));
    }

    #[test]
    fn test_release_propagates() {
        let mut combined = ControllerState::default();
        let mut held = ControllerState::default();
        held.set_button(Button::Start, true);
        held.right_y = 1.0;

        combined.apply_differences(&ControllerState::default(), &held);
        combined.apply_differences(&held, &ControllerState::default());

        assert_eq!(combined, ControllerState::NEUTRAL);
    }

    #[test]
    fn test_snapshot_edges() {
        let mut snapshot = ControllerSnapshot::default();
        let mut down = ControllerState::default();
        down.set_button(Button::Start, true);

        snapshot.advance(&down);
        assert!(snapshot.pressed(Button::Start));
        snapshot.advance(&down);
        assert!(!snapshot.pressed(Button::Start));
        snapshot.advance(&ControllerState::default());
        assert!(snapshot.released(Button::Start));
    }

    fn state_strategy() -> impl Strategy<Value = ControllerState> {
        (
            prop_oneof![Just(0.0f32), Just(-1.0f32), Just(1.0f32), -1.0f32..1.0],
            prop_oneof![Just(0.0f32), -1.0f32..1.0],
            prop_oneof![Just(0.0f32), -1.0f32..1.0],
            prop_oneof![Just(0.0f32), -1.0f32..1.0],
            0u32..(1 << 13),
        )
            .prop_map(|(left_x, left_y, right_x, right_y, bits)| ControllerState {
                left_x,
                left_y,
                right_x,
                right_y,
                buttons: bits & !1,
            })
    }

    proptest! {
        #[test]
        #[allow(clippy::float_cmp)]
        fn prop_merge_is_deterministic(
            prior in state_strategy(),
            a_old in state_strategy(),
            a_new in state_strategy(),
            b_old in state_strategy(),
            b_new in state_strategy(),
        ) {
            let mut combined = prior;
            combined.apply_differences(&a_old, &a_new);
            combined.apply_differences(&b_old, &b_new);

            let fields = combined.axes();
            for i in 0..4 {
                let a_changed = a_old.axes()[i] != a_new.axes()[i];
                let b_changed = b_old.axes()[i] != b_new.axes()[i];
                let expected = if b_changed {
                    b_new.axes()[i]
                } else if a_changed {
                    a_new.axes()[i]
                } else {
                    prior.axes()[i]
                };
                prop_assert_eq!(fields[i], expected);
            }

            for button in Button::ALL {
                let expected = if b_old.button(button) != b_new.button(button) {
                    b_new.button(button)
                } else if a_old.button(button) != a_new.button(button) {
                    a_new.button(button)
                } else {
                    prior.button(button)
                };
                prop_assert_eq!(combined.button(button), expected);
            }
        }
    }
}
