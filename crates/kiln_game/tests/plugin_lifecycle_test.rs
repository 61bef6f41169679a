//! Integration test for binding, first-run initialization and reload.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use kiln_core::{
    ArenaRef, AssetError, AssetResult, Button, ControllerState, FrameSurface, GamePlugin,
    HostServices, Image, LogLevel, MemoryArena, PluginPhase, SoundCommand, SoundHandle,
    PERSISTENT_MEMORY_SIZE, TRANSIENT_MEMORY_SIZE,
};
use kiln_game::{create_plugin, GameLogic, GlobalState, MATCH_LENGTH_SECONDS, NOISE_SAMPLE};

const STEP: f32 = 1.0 / 60.0;

#[derive(Default)]
struct CountingHost {
    sound_loads: Cell<u32>,
    commands: RefCell<Vec<SoundCommand>>,
    lines: RefCell<Vec<(LogLevel, String)>>,
}

impl CountingHost {
    fn logged(&self, level: LogLevel, prefix: &str) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|(at, line)| *at == level && line.starts_with(prefix))
            .count()
    }
}

impl HostServices for CountingHost {
    fn load_image(&self, name: &str) -> AssetResult<Image> {
        Err(AssetError::NotFound {
            name: name.to_owned(),
        })
    }

    fn load_sound_sample(&self, name: &str) -> SoundHandle {
        assert_eq!(name, NOISE_SAMPLE);
        self.sound_loads.set(self.sound_loads.get() + 1);
        SoundHandle::new(self.sound_loads.get())
    }

    fn control_sound(&self, _handle: SoundHandle, command: SoundCommand) {
        self.commands.borrow_mut().push(command);
    }

    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

struct Rig {
    host: Rc<CountingHost>,
    persistent: ArenaRef,
    transient: ArenaRef,
}

impl Rig {
    fn new() -> Self {
        Self {
            host: Rc::new(CountingHost::default()),
            persistent: MemoryArena::shared(PERSISTENT_MEMORY_SIZE),
            transient: MemoryArena::shared(TRANSIENT_MEMORY_SIZE),
        }
    }

    fn bind(&self, plugin: &mut dyn GamePlugin) {
        plugin.bind_host(self.host.clone());
        plugin.bind_persistent(Rc::clone(&self.persistent));
        plugin.bind_transient(Rc::clone(&self.transient));
    }

    fn state(&self) -> GlobalState {
        *self.persistent.borrow().root::<GlobalState>()
    }
}

fn start_pressed() -> ControllerState {
    let mut state = ControllerState::NEUTRAL;
    state.set_button(Button::Start, true);
    state
}

#[test]
fn test_first_update_initializes_once() {
    let rig = Rig::new();
    let mut plugin = GameLogic::new();
    rig.bind(&mut plugin);
    assert_eq!(plugin.phase(), PluginPhase::Bound);

    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert!(rig.state().initialized());
    assert_eq!(plugin.phase(), PluginPhase::Running);
    assert_eq!(rig.host.sound_loads.get(), 1);
    assert_eq!(
        *rig.host.commands.borrow(),
        vec![SoundCommand::Play { looped: true }]
    );

    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert_eq!(rig.host.sound_loads.get(), 1);
    assert_eq!(rig.host.commands.borrow().len(), 1);
}

#[test]
fn test_reload_keeps_state_and_skips_init() {
    let rig = Rig::new();
    let mut old = create_plugin();
    rig.bind(old.as_mut());
    old.update(STEP, &ControllerState::NEUTRAL);
    old.update(STEP, &ControllerState::NEUTRAL);
    let before = rig.state();
    drop(old);

    // A new build over the same persistent bytes.
    let mut new = create_plugin();
    rig.bind(new.as_mut());
    assert!(rig.state().initialized());

    new.update(STEP, &ControllerState::NEUTRAL);
    assert_eq!(rig.host.sound_loads.get(), 1);
    let after = rig.state();
    assert_eq!(after.noise_sample, before.noise_sample);
    assert!((after.current_time - (before.current_time + STEP)).abs() < 1e-6);
}

#[test]
fn test_reset_arena_reinitializes() {
    let rig = Rig::new();
    let mut plugin = GameLogic::new();
    rig.bind(&mut plugin);
    plugin.update(STEP, &ControllerState::NEUTRAL);

    rig.persistent.borrow_mut().reset();
    rig.transient.borrow_mut().reset();
    assert!(!rig.state().initialized());

    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert!(rig.state().initialized());
    assert_eq!(rig.host.sound_loads.get(), 2);
}

#[test]
fn test_start_edge_toggles_pause_and_freezes_timers() {
    let rig = Rig::new();
    let mut plugin = GameLogic::new();
    rig.bind(&mut plugin);

    plugin.update(STEP, &ControllerState::NEUTRAL);
    plugin.update(STEP, &start_pressed());
    assert!(rig.state().paused());
    assert_eq!(rig.host.commands.borrow().last(), Some(&SoundCommand::Pause));

    // Holding Start is not a second press.
    let frozen = rig.state().current_time;
    plugin.update(STEP, &start_pressed());
    assert!(rig.state().paused());
    assert!((rig.state().current_time - frozen).abs() < f32::EPSILON);

    plugin.update(STEP, &ControllerState::NEUTRAL);
    plugin.update(STEP, &start_pressed());
    assert!(!rig.state().paused());
    assert_eq!(rig.host.commands.borrow().last(), Some(&SoundCommand::Resume));
}

#[test]
fn test_match_completes_once() {
    let rig = Rig::new();
    let mut plugin = GameLogic::new();
    rig.bind(&mut plugin);

    plugin.update(MATCH_LENGTH_SECONDS + 1.0, &ControllerState::NEUTRAL);
    assert!(rig.state().completed());
    assert_eq!(rig.host.commands.borrow().last(), Some(&SoundCommand::Stop));

    let stops_before = rig.host.commands.borrow().len();
    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert_eq!(rig.host.commands.borrow().len(), stops_before);
}

#[test]
fn test_render_writes_every_pixel() {
    let rig = Rig::new();
    let mut plugin = GameLogic::new();
    rig.bind(&mut plugin);
    plugin.update(STEP, &ControllerState::NEUTRAL);

    let mut surface = FrameSurface::new(300, 2);
    surface.framebuffer().fill(0x1234_5678);
    plugin.render(&mut surface.framebuffer());

    assert_eq!(surface.pixel(0, 0), 0xFF00_0000);
    assert_eq!(surface.pixel(5, 1), 0xFF00_0105);
    // x wraps at 256.
    assert_eq!(surface.pixel(257, 0), 0xFF00_0001);
}

#[test]
#[should_panic(expected = "before host, persistent and transient")]
fn test_update_before_binding_panics() {
    let mut plugin = GameLogic::new();
    plugin.update(STEP, &ControllerState::NEUTRAL);
}

#[test]
fn test_game_logs_through_host() {
    let rig = Rig::new();
    let mut plugin = create_plugin();
    rig.bind(plugin.as_mut());

    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert_eq!(rig.host.logged(LogLevel::Info, "game state initialized"), 1);

    plugin.update(STEP, &start_pressed());
    assert_eq!(rig.host.logged(LogLevel::Debug, "pause toggled, paused true"), 1);
    plugin.update(STEP, &ControllerState::NEUTRAL);
    plugin.update(STEP, &start_pressed());
    assert_eq!(rig.host.logged(LogLevel::Debug, "pause toggled, paused false"), 1);

    plugin.update(MATCH_LENGTH_SECONDS, &ControllerState::NEUTRAL);
    plugin.update(STEP, &ControllerState::NEUTRAL);
    assert_eq!(rig.host.logged(LogLevel::Info, "match completed"), 1);
    assert_eq!(rig.host.lines.borrow().len(), 4);
}
