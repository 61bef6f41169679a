//! The two capability sets that meet at the plugin boundary.

use std::fmt;
use std::rc::Rc;

use crate::asset::{Image, SoundCommand, SoundHandle, SoundSample};
use crate::error::AssetResult;
use crate::framebuffer::Framebuffer;
use crate::input::ControllerState;
use crate::memory::ArenaRef;

/// Severity of a message game logic sends through [`HostServices::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Fine-grained state changes.
    Debug,
    /// Milestones worth seeing in a normal run.
    Info,
    /// Something went wrong but the game carries on.
    Warn,
    /// Something the game could not recover from.
    Error,
}

/// Services the host offers to game logic.
///
/// Every call is synchronous and runs on the loop thread.
pub trait HostServices {
    /// Loads and decodes an image by logical name.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`](crate::AssetError) if the file is missing,
    /// unreadable or cannot be decoded.
    fn load_image(&self, name: &str) -> AssetResult<Image>;

    /// Loads a sound sample by logical name.
    ///
    /// Never fails visibly: an asset that cannot be loaded yields
    /// [`SoundHandle::INERT`].
    fn load_sound_sample(&self, name: &str) -> SoundHandle;

    /// Applies a playback command. Unknown and inert handles are ignored.
    fn control_sound(&self, handle: SoundHandle, command: SoundCommand);

    /// Writes a line to the host's log.
    ///
    /// A dynamically loaded library carries its own copy of any logging
    /// crate, with no subscriber installed, so game logic logs through here
    /// to reach the host's output. The default discards the message.
    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        let _ = (level, message);
    }
}

impl<'a> dyn HostServices + 'a {
    /// Pairs `handle` with this host for playback control.
    #[must_use]
    pub fn sound(&self, handle: SoundHandle) -> SoundSample<'_> {
        SoundSample::new(self, handle)
    }
}

/// Shared handle to the host services, handed to a plugin at bind time.
pub type HostHandle = Rc<dyn HostServices>;

/// A game module the host drives.
///
/// The host calls `bind_host`, `bind_persistent` and `bind_transient` before
/// the first `update`, and again after every reload. A plugin keeps nothing
/// outside the persistent arena that it cannot rebuild from it.
pub trait GamePlugin {
    /// Bytes of persistent arena the root state needs.
    ///
    /// The host refuses to bind a plugin whose state exceeds the persistent
    /// capacity.
    fn state_size(&self) -> usize;

    /// Supplies the host services.
    fn bind_host(&mut self, host: HostHandle);

    /// Supplies the persistent arena. Its root bytes are the plugin's state.
    fn bind_persistent(&mut self, arena: ArenaRef);

    /// Supplies the transient arena, rewound by the host before every frame.
    fn bind_transient(&mut self, arena: ArenaRef);

    /// Advances the game by one fixed tick.
    ///
    /// # Panics
    ///
    /// Implementations panic if called before all three regions are bound.
    fn update(&mut self, timestep: f32, input: &ControllerState);

    /// Writes every pixel of `target`.
    ///
    /// # Panics
    ///
    /// Implementations panic if called before all three regions are bound.
    fn render(&mut self, target: &mut Framebuffer<'_>);
}
