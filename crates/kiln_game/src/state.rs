//! The root state value stored in the persistent arena.

use bytemuck::{Pod, Zeroable};
use kiln_core::{Button, ControllerSnapshot, SoundHandle, PERSISTENT_MEMORY_SIZE};

/// Seconds of running (unpaused) time before a match completes.
pub const MATCH_LENGTH_SECONDS: f32 = 120.0;

/// Durable game state.
///
/// Flags are `u32` so the whole value is plain old data with no padding;
/// a zeroed arena reads as a valid, uninitialized state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GlobalState {
    /// Non-zero once assets are loaded.
    pub is_initialized: u32,
    /// Non-zero while paused.
    pub is_paused: u32,
    /// Non-zero once the match clock ran out.
    pub is_game_completed: u32,
    /// Seconds since the game started, paused time excluded.
    pub current_time: f32,
    /// Seconds into the current match, paused time excluded.
    pub match_time: f32,
    /// Controller state on the previous and current tick.
    pub controller: ControllerSnapshot,
    /// Looping background noise.
    pub noise_sample: SoundHandle,
}

const _: () = assert!(
    std::mem::size_of::<GlobalState>() < PERSISTENT_MEMORY_SIZE,
    "GlobalState outgrew the persistent arena"
);

impl GlobalState {
    /// True once [`GameLogic`](crate::GameLogic) has loaded its assets.
    #[inline]
    #[must_use]
    pub const fn initialized(&self) -> bool {
        self.is_initialized != 0
    }

    /// True while the game is paused.
    #[inline]
    #[must_use]
    pub const fn paused(&self) -> bool {
        self.is_paused != 0
    }

    /// True once the match clock ran out.
    #[inline]
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.is_game_completed != 0
    }

    /// True on the tick `button` went down.
    #[inline]
    #[must_use]
    pub const fn is_button_pressed(&self, button: Button) -> bool {
        self.controller.pressed(button)
    }
}
