//! Update and render for the reference game.

use kiln_core::{
    ArenaRef, Button, ControllerState, Framebuffer, GamePlugin, HostHandle, HostServices,
    LogLevel, PluginBindings, PluginPhase,
};

use crate::state::{GlobalState, MATCH_LENGTH_SECONDS};

/// Logical name of the looping background sample.
pub const NOISE_SAMPLE: &str = "noise.wav";

const OPAQUE: u32 = 0xFF00_0000;

/// The reference game module.
///
/// Holds nothing but its bindings; all game state is in [`GlobalState`].
#[derive(Debug, Default)]
pub struct GameLogic {
    bindings: PluginBindings,
}

impl GameLogic {
    /// Creates an unbound instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> PluginPhase {
        self.bindings.phase()
    }
}

/// Loads assets on the first tick after the root state was zeroed.
fn initialize(state: &mut GlobalState, host: &dyn HostServices) {
    if state.initialized() {
        return;
    }

    state.noise_sample = host.load_sound_sample(NOISE_SAMPLE);
    host.sound(state.noise_sample).play(true);
    state.is_initialized = 1;
    host.log(
        LogLevel::Info,
        format_args!("game state initialized, sample {}", state.noise_sample.raw()),
    );
}

/// Test pattern color for one pixel: red follows x, green follows y.
#[inline]
fn pattern(x: u32, y: u32, paused: bool) -> u32 {
    let color = (x & 0xFF) | ((y & 0xFF) << 8);
    if paused {
        ((color >> 1) & 0x007F_7F7F) | OPAQUE
    } else {
        color | OPAQUE
    }
}

impl GamePlugin for GameLogic {
    fn state_size(&self) -> usize {
        std::mem::size_of::<GlobalState>()
    }

    fn bind_host(&mut self, host: HostHandle) {
        self.bindings.bind_host(host);
    }

    fn bind_persistent(&mut self, arena: ArenaRef) {
        self.bindings.bind_persistent(arena);
    }

    fn bind_transient(&mut self, arena: ArenaRef) {
        self.bindings.bind_transient(arena);
    }

    fn update(&mut self, timestep: f32, input: &ControllerState) {
        let regions = self.bindings.enter();
        let mut persistent = regions.persistent.borrow_mut();
        let state = persistent.place_root::<GlobalState>();

        initialize(state, regions.host);
        state.controller.advance(input);

        if state.is_button_pressed(Button::Start) {
            state.is_paused ^= 1;
            let noise = regions.host.sound(state.noise_sample);
            if state.paused() {
                noise.pause();
            } else {
                noise.resume();
            }
            regions.host.log(
                LogLevel::Debug,
                format_args!("pause toggled, paused {}", state.paused()),
            );
        }

        if state.paused() {
            return;
        }

        state.current_time += timestep;
        if !state.completed() {
            state.match_time += timestep;
            if state.match_time >= MATCH_LENGTH_SECONDS {
                state.is_game_completed = 1;
                regions.host.sound(state.noise_sample).stop();
                regions.host.log(
                    LogLevel::Info,
                    format_args!("match completed after {:.2}s", state.match_time),
                );
            }
        }
    }

    fn render(&mut self, target: &mut Framebuffer<'_>) {
        let regions = self.bindings.enter();
        let paused = regions.persistent.borrow().root::<GlobalState>().paused();
        let mut transient = regions.transient.borrow_mut();
        let row = transient.allocate_slice::<u32>(target.width as usize);

        for y in 0..target.height {
            for (x, pixel) in (0u32..).zip(row.iter_mut()) {
                *pixel = pattern(x, y, paused);
            }
            let dest = target.row_mut(y);
            for (bytes, pixel) in dest.chunks_exact_mut(4).zip(row.iter()) {
                bytes.copy_from_slice(&pixel.to_le_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matches_reference_formula() {
        assert_eq!(pattern(0, 0, false), 0xFF00_0000);
        assert_eq!(pattern(0x12, 0x34, false), 0xFF00_3412);
        assert_eq!(pattern(0x112, 0x234, false), 0xFF00_3412);
    }

    #[test]
    fn test_paused_pattern_is_darker_and_opaque() {
        let lit = pattern(200, 100, false);
        let dim = pattern(200, 100, true);
        assert_eq!(dim >> 24, 0xFF);
        assert!(dim & 0xFF < lit & 0xFF);
        assert!((dim >> 8) & 0xFF < (lit >> 8) & 0xFF);
    }

    #[test]
    fn test_new_instance_is_unbound() {
        assert_eq!(GameLogic::new().phase(), PluginPhase::Unbound);
    }
}
