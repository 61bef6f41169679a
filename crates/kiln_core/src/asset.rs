//! # Asset Types
//!
//! Values that cross the plugin boundary when game logic asks the host for
//! assets: decoded images and sound handles.

use bytemuck::{Pod, Zeroable};

use crate::plugin::HostServices;

/// A decoded image, RGBA8 with red in the lowest byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Distance between rows in bytes.
    pub pitch: usize,
    /// Bits per pixel. Always 32 for host-decoded images.
    pub bpp: u32,
    /// Pixel bytes, `pitch * height` long.
    pub data: Vec<u8>,
}

impl Image {
    /// Reads one packed pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let offset = y as usize * self.pitch + x as usize * 4;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        u32::from_le_bytes(bytes)
    }
}

/// Identifies a loaded sound sample in the host's sound bank.
///
/// Plain old data, so game logic can keep it in the persistent arena and it
/// survives a reload. Handle `0` is the inert handle: every command sent to
/// it is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// The handle returned when a sample could not be loaded.
    pub const INERT: Self = Self(0);

    /// Wraps a raw bank slot id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw bank slot id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// True for the handle that ignores every command.
    #[inline]
    #[must_use]
    pub const fn is_inert(self) -> bool {
        self.0 == 0
    }
}

/// A playback command for one sound sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    /// Start from the beginning.
    Play {
        /// Restart at the end instead of stopping.
        looped: bool,
    },
    /// Hold the playback position.
    Pause,
    /// Continue from the held position.
    Resume,
    /// Stop and rewind.
    Stop,
}

/// A sound handle paired with the host that owns it.
///
/// Obtained through `<dyn HostServices>::sound`.
#[derive(Clone, Copy)]
pub struct SoundSample<'h> {
    host: &'h dyn HostServices,
    handle: SoundHandle,
}

impl<'h> SoundSample<'h> {
    pub(crate) fn new(host: &'h dyn HostServices, handle: SoundHandle) -> Self {
        Self { host, handle }
    }

    /// The underlying handle.
    #[must_use]
    pub const fn handle(&self) -> SoundHandle {
        self.handle
    }

    /// Starts playback from the beginning.
    pub fn play(&self, looped: bool) {
        self.send(SoundCommand::Play { looped });
    }

    /// Pauses playback.
    pub fn pause(&self) {
        self.send(SoundCommand::Pause);
    }

    /// Resumes paused playback.
    pub fn resume(&self) {
        self.send(SoundCommand::Resume);
    }

    /// Stops playback.
    pub fn stop(&self) {
        self.send(SoundCommand::Stop);
    }

    fn send(&self, command: SoundCommand) {
        if !self.handle.is_inert() {
            self.host.control_sound(self.handle, command);
        }
    }
}

impl std::fmt::Debug for SoundSample<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundSample")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AssetError, AssetResult};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        commands: RefCell<Vec<(SoundHandle, SoundCommand)>>,
    }

    impl HostServices for Recorder {
        fn load_image(&self, name: &str) -> AssetResult<Image> {
            Err(AssetError::NotFound { name: name.to_owned() })
        }

        fn load_sound_sample(&self, _name: &str) -> SoundHandle {
            SoundHandle::new(7)
        }

        fn control_sound(&self, handle: SoundHandle, command: SoundCommand) {
            self.commands.borrow_mut().push((handle, command));
        }
    }

    #[test]
    fn test_inert_handle_sends_nothing() {
        let host = Recorder::default();
        let services: &dyn HostServices = &host;
        let sample = services.sound(SoundHandle::INERT);
        sample.play(true);
        sample.pause();
        sample.stop();
        assert!(host.commands.borrow().is_empty());
    }

    #[test]
    fn test_live_handle_forwards_commands() {
        let host = Recorder::default();
        let services: &dyn HostServices = &host;
        let handle = services.load_sound_sample("noise.wav");
        let sample = services.sound(handle);
        sample.play(true);
        sample.pause();
        sample.resume();

        let commands = host.commands.borrow();
        assert_eq!(
            *commands,
            vec![
                (handle, SoundCommand::Play { looped: true }),
                (handle, SoundCommand::Pause),
                (handle, SoundCommand::Resume),
            ]
        );
    }

    #[test]
    fn test_zeroed_handle_is_inert() {
        let handle: SoundHandle = bytemuck::Zeroable::zeroed();
        assert!(handle.is_inert());
        assert!(!SoundHandle::new(1).is_inert());
    }

    #[test]
    fn test_image_pixel_reads_le() {
        let image = Image {
            width: 1,
            height: 2,
            pitch: 4,
            bpp: 32,
            data: vec![0, 0, 0, 0, 0x10, 0x20, 0x30, 0xFF],
        };
        assert_eq!(image.pixel(0, 1), 0xFF30_2010);
    }
}
