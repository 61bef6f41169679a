//! # Asset Services
//!
//! The host side of [`HostServices`]: resolves logical names against the
//! asset root and decodes synchronously on the loop thread.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use kiln_core::{
    AssetError, AssetResult, HostServices, Image, LogLevel, SoundCommand, SoundHandle,
};

use crate::audio::{SoundBank, SoundData};

/// Target of events game logic sends through [`HostServices::log`], so a
/// filter like `kiln_game=debug` works the same in both plugin modes.
pub const GAME_LOG_TARGET: &str = "kiln_game";

/// Asset loader and sound bank handed to plugins.
#[derive(Debug)]
pub struct AssetHost {
    root: PathBuf,
    sounds: RefCell<SoundBank>,
}

impl AssetHost {
    /// Creates a host resolving names under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sounds: RefCell::new(SoundBank::new()),
        }
    }

    /// The asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read access to the sound bank.
    ///
    /// # Panics
    ///
    /// Panics if called while a plugin call into the bank is in progress.
    #[must_use]
    pub fn sounds(&self) -> Ref<'_, SoundBank> {
        self.sounds.borrow()
    }

    /// Pulls mixed audio for an output backend.
    pub fn mix_into(&self, output: &mut [f32]) {
        self.sounds.borrow_mut().mix_into(output);
    }

    /// Drops every loaded sound. Used when game state is wiped, since no
    /// surviving state can refer to the old handles.
    pub fn release_sounds(&self) {
        self.sounds.borrow_mut().clear();
    }

    fn read(&self, name: &str) -> AssetResult<Vec<u8>> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|error| match error.kind() {
            ErrorKind::NotFound => AssetError::NotFound {
                name: name.to_owned(),
            },
            _ => AssetError::Io {
                name: name.to_owned(),
                reason: error.to_string(),
            },
        })
    }

    fn decode_sound(&self, name: &str) -> AssetResult<SoundData> {
        let bytes = self.read(name)?;
        SoundData::from_wav(&bytes).map_err(|error| AssetError::Decode {
            name: name.to_owned(),
            reason: error.to_string(),
        })
    }
}

impl HostServices for AssetHost {
    fn load_image(&self, name: &str) -> AssetResult<Image> {
        let result = self.read(name).and_then(|bytes| {
            image::load_from_memory(&bytes)
                .map_err(|error| AssetError::Decode {
                    name: name.to_owned(),
                    reason: error.to_string(),
                })
        });

        match result {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                tracing::debug!(name, width, height, "image loaded");
                Ok(Image {
                    width,
                    height,
                    pitch: width as usize * 4,
                    bpp: 32,
                    data: rgba.into_raw(),
                })
            }
            Err(error) => {
                tracing::warn!(%error, "image load failed");
                Err(error)
            }
        }
    }

    fn load_sound_sample(&self, name: &str) -> SoundHandle {
        match self.decode_sound(name) {
            Ok(data) => {
                let handle = self.sounds.borrow_mut().insert(name, data);
                tracing::debug!(name, handle = handle.raw(), "sound sample loaded");
                handle
            }
            Err(error) => {
                tracing::warn!(%error, "sound sample load failed, using inert handle");
                SoundHandle::INERT
            }
        }
    }

    fn control_sound(&self, handle: SoundHandle, command: SoundCommand) {
        self.sounds.borrow_mut().control(handle, command);
    }

    fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        match level {
            LogLevel::Debug => tracing::debug!(target: GAME_LOG_TARGET, "{message}"),
            LogLevel::Info => tracing::info!(target: GAME_LOG_TARGET, "{message}"),
            LogLevel::Warn => tracing::warn!(target: GAME_LOG_TARGET, "{message}"),
            LogLevel::Error => tracing::error!(target: GAME_LOG_TARGET, "{message}"),
        }
    }
}
