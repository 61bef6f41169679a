//! # Kiln Host Loop
//!
//! One iteration of [`HostLoop::frame`]:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. REFRESH PLUGIN                                                   │
//! │    └─ Loaded? bind host, persistent, transient (same arenas)        │
//! │                                                                     │
//! │ 2. REWIND TRANSIENT ARENA                                           │
//! │                                                                     │
//! │ 3. INPUT                                                            │
//! │    ├─ Snapshot keyboard, apply events (R restarts, F1 quits)        │
//! │    └─ Sample gamepad, merge keyboard then gamepad                   │
//! │                                                                     │
//! │ 4. FIXED UPDATES (0..=max_updates_per_frame)                        │
//! │                                                                     │
//! │ 5. RENDER + PRESENT                                                 │
//! │    └─ Clear color alone when no plugin is active                    │
//! │                                                                     │
//! │ 6. FPS TITLE (once per second)                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop owns both arenas for its whole lifetime. Plugins come and go
//! through the [`PluginProvider`]; the arenas never do.

use std::rc::Rc;
use std::time::{Duration, Instant};

use kiln_core::{pack_rgba, ArenaRef, FrameSurface, HostHandle, MemoryArena};

use crate::assets::AssetHost;
use crate::config::{HostConfig, TimingConfig};
use crate::error::{HostError, HostResult};
use crate::input::{InputMerger, Key};
use crate::platform::{HostEvent, Platform};
use crate::plugin::{PluginProvider, RefreshOutcome};

/// Background shown while game logic can be swapped at runtime.
pub const LIVE_CLEAR_COLOR: u32 = pack_rgba(255, 0, 255, 255);

/// Background shown by a statically linked build.
pub const STATIC_CLEAR_COLOR: u32 = pack_rgba(0, 0, 0, 255);

/// Fixed-timestep accumulator.
///
/// Elapsed wall time is banked and paid out in whole steps. A step may run
/// up to `tolerance` seconds early, and the bank is capped at
/// `max_updates` steps so a long stall never turns into a spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    step: f32,
    tolerance: f32,
    max_updates: u32,
    accumulator: f32,
}

impl FixedStep {
    /// Creates an empty accumulator for the given timing.
    #[must_use]
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            step: timing.timestep(),
            tolerance: timing.step_tolerance,
            max_updates: timing.max_updates_per_frame,
            accumulator: 0.0,
        }
    }

    /// Banks `elapsed` seconds and returns how many updates to run now.
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let cap = self.step * self.max_updates as f32;
        self.accumulator = (self.accumulator + elapsed.max(0.0)).min(cap);

        let mut updates = 0;
        while self.accumulator >= self.step - self.tolerance && updates < self.max_updates {
            self.accumulator -= self.step;
            updates += 1;
        }
        updates
    }

    /// Seconds per update.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Seconds banked but not yet paid out. Slightly negative after an
    /// early step.
    #[must_use]
    pub const fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

/// Counts frames and reports the rate once per second.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
}

impl FpsCounter {
    /// Records one frame; returns the rate when a full second has passed.
    pub fn tick(&mut self, elapsed: Duration) -> Option<f64> {
        self.frames += 1;
        self.window += elapsed;
        if self.window < Duration::from_secs(1) {
            return None;
        }
        let fps = f64::from(self.frames) / self.window.as_secs_f64();
        *self = Self::default();
        Some(fps)
    }
}

/// What one call to [`HostLoop::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame number.
    pub frame: u64,
    /// Provider refresh result at the top of the frame.
    pub outcome: RefreshOutcome,
    /// Steps the clock paid out.
    pub ticks: u32,
    /// Steps actually handed to a plugin.
    pub updates: u32,
    /// True if a plugin rendered this frame.
    pub rendered: bool,
    /// Frame rate, on the frames where it was recomputed.
    pub fps: Option<f64>,
}

/// The platform loop: owns the arenas, input, framebuffer and plugin source.
pub struct HostLoop<P: Platform> {
    config: HostConfig,
    platform: P,
    provider: Box<dyn PluginProvider>,
    services: Rc<AssetHost>,
    persistent: ArenaRef,
    transient: ArenaRef,
    surface: FrameSurface,
    input: InputMerger,
    clock: FixedStep,
    fps: FpsCounter,
    events: Vec<HostEvent>,
    frame_index: u64,
    plugin_bound: bool,
    quitting: bool,
}

impl<P: Platform> HostLoop<P> {
    /// Validates the config and allocates both arenas and the framebuffer.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidConfig`] if the config is unusable.
    pub fn new(
        config: HostConfig,
        platform: P,
        provider: Box<dyn PluginProvider>,
    ) -> HostResult<Self> {
        config.validate()?;

        let persistent = MemoryArena::shared(config.memory.persistent_bytes);
        let transient = MemoryArena::shared(config.memory.transient_bytes);
        let surface = FrameSurface::new(
            config.window.framebuffer_width,
            config.window.framebuffer_height,
        );
        let services = Rc::new(AssetHost::new(config.assets.root.clone()));

        tracing::info!(
            plugin = provider.label(),
            persistent_bytes = config.memory.persistent_bytes,
            transient_bytes = config.memory.transient_bytes,
            update_hz = config.timing.update_hz,
            "host loop created"
        );

        Ok(Self {
            clock: FixedStep::new(&config.timing),
            config,
            platform,
            provider,
            services,
            persistent,
            transient,
            surface,
            input: InputMerger::new(),
            fps: FpsCounter::default(),
            events: Vec::new(),
            frame_index: 0,
            plugin_bound: false,
            quitting: false,
        })
    }

    /// Runs one frame as if `elapsed` wall time passed since the last one.
    ///
    /// # Errors
    ///
    /// Returns whatever the platform's `present` returns.
    pub fn frame(&mut self, elapsed: Duration) -> HostResult<FrameReport> {
        let outcome = self.provider.refresh();
        match outcome {
            RefreshOutcome::Loaded => self.plugin_bound = self.bind_active(),
            RefreshOutcome::Failed => self.plugin_bound = false,
            RefreshOutcome::Unchanged => {}
        }

        self.transient.borrow_mut().clear();
        self.process_events();

        let ticks = self.clock.advance(elapsed.as_secs_f32());
        let step = self.clock.step();
        let mut updates = 0;
        if self.plugin_bound {
            if let Some(plugin) = self.provider.active() {
                for _ in 0..ticks {
                    plugin.update(step, self.input.combined());
                    updates += 1;
                }
            }
        }

        let clear_color = self.clear_color();
        let mut rendered = false;
        if self.plugin_bound {
            if let Some(plugin) = self.provider.active() {
                let mut framebuffer = self.surface.framebuffer();
                framebuffer.fill(clear_color);
                plugin.render(&mut framebuffer);
                rendered = true;
            }
        }
        self.platform
            .present(rendered.then_some(&self.surface), clear_color)?;

        let fps = self.fps.tick(elapsed);
        if let Some(fps) = fps {
            tracing::debug!(fps, "frame rate");
            let title = format!("{} - {fps:.2}", self.config.window.title);
            self.platform.set_title(&title);
        }

        let report = FrameReport {
            frame: self.frame_index,
            outcome,
            ticks,
            updates,
            rendered,
            fps,
        };
        tracing::trace!(?report, "frame done");
        self.frame_index += 1;
        Ok(report)
    }

    /// Drives [`frame`](Self::frame) with wall-clock time, sleeping to the
    /// target frame rate, until a quit request or `max_frames` frames.
    ///
    /// Returns the number of frames run.
    ///
    /// # Errors
    ///
    /// Stops at the first frame error and returns it.
    pub fn run(&mut self, max_frames: Option<u64>) -> HostResult<u64> {
        let budget = self.config.timing.frame_duration();
        let mut last = Instant::now();
        let mut frames = 0;

        while !self.quitting && !max_frames.is_some_and(|max| frames >= max) {
            let start = Instant::now();
            let elapsed = start.duration_since(last);
            last = start;

            self.frame(elapsed)?;
            frames += 1;

            if let Some(rest) = budget.checked_sub(start.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        tracing::info!(frames, quit = self.quitting, "host loop stopped");
        Ok(frames)
    }

    /// Zero-fills both arenas and releases every sound. The plugin sees
    /// uninitialized state on its next update and starts over.
    pub fn restart(&mut self) {
        self.persistent.borrow_mut().reset();
        self.transient.borrow_mut().reset();
        self.services.release_sounds();
        tracing::info!("restart requested, arenas reset");
    }

    /// Asks [`run`](Self::run) to stop after the current frame.
    pub fn quit(&mut self) {
        self.quitting = true;
    }

    /// The background for frames without plugin output.
    #[must_use]
    pub fn clear_color(&self) -> u32 {
        if self.provider.hot_reloadable() {
            LIVE_CLEAR_COLOR
        } else {
            STATIC_CLEAR_COLOR
        }
    }

    /// The persistent arena.
    #[must_use]
    pub fn persistent(&self) -> &ArenaRef {
        &self.persistent
    }

    /// The transient arena.
    #[must_use]
    pub fn transient(&self) -> &ArenaRef {
        &self.transient
    }

    /// The services offered to plugins.
    #[must_use]
    pub fn services(&self) -> &Rc<AssetHost> {
        &self.services
    }

    /// The platform backend.
    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform backend, e.g. to script input.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The merged input state.
    #[must_use]
    pub const fn input(&self) -> &InputMerger {
        &self.input
    }

    /// True once a quit was requested.
    #[must_use]
    pub const fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// True while a plugin is bound and receiving calls.
    #[must_use]
    pub const fn is_plugin_bound(&self) -> bool {
        self.plugin_bound
    }

    /// Binds the provider's current plugin to the host and both arenas.
    ///
    /// A plugin whose state does not fit the persistent arena is refused
    /// and stays unbound.
    fn bind_active(&mut self) -> bool {
        let capacity = self.persistent.borrow().capacity();
        let label = self.provider.label().to_owned();
        let Some(plugin) = self.provider.active() else {
            return false;
        };

        let required = plugin.state_size();
        if required > capacity {
            let error = HostError::StateTooLarge { required, capacity };
            tracing::error!(%error, plugin = %label, "plugin refused");
            return false;
        }

        let host: HostHandle = Rc::clone(&self.services) as HostHandle;
        plugin.bind_host(host);
        plugin.bind_persistent(Rc::clone(&self.persistent));
        plugin.bind_transient(Rc::clone(&self.transient));
        tracing::info!(plugin = %label, state_size = required, "plugin bound");
        true
    }

    fn process_events(&mut self) {
        self.input.begin_frame();

        let mut events = std::mem::take(&mut self.events);
        self.platform.poll_events(&mut events);
        for event in events.drain(..) {
            match event {
                HostEvent::Quit => {
                    tracing::info!("quit requested");
                    self.quitting = true;
                }
                HostEvent::Key {
                    key: Key::R,
                    pressed: true,
                } => self.restart(),
                HostEvent::Key {
                    key: Key::F1,
                    pressed: true,
                } => {
                    tracing::info!("quit key pressed");
                    self.quitting = true;
                }
                HostEvent::Key { key, pressed } => self.input.key(key, pressed),
            }
        }
        self.events = events;

        let gamepad = self.platform.sample_gamepad();
        self.input.finish_frame(gamepad.as_ref());
    }
}

impl<P: Platform> std::fmt::Debug for HostLoop<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLoop")
            .field("plugin", &self.provider.label())
            .field("frame", &self.frame_index)
            .field("plugin_bound", &self.plugin_bound)
            .field("quitting", &self.quitting)
            .finish_non_exhaustive()
    }
}
