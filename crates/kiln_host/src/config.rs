//! # Host Configuration
//!
//! Loaded once at startup from an optional `kiln.toml`. Every field has a
//! default, so an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! log_filter = "info,kiln_host=debug"
//!
//! [window]
//! title = "Kiln"
//!
//! [timing]
//! update_hz = 60
//!
//! [plugin]
//! mode = "dynamic"
//! library = "target/debug/libkiln_game.so"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use kiln_core::{BYTES_PER_PIXEL, PERSISTENT_MEMORY_SIZE, TRANSIENT_MEMORY_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "kiln.toml";

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Window and framebuffer.
    pub window: WindowConfig,
    /// Loop timing.
    pub timing: TimingConfig,
    /// Arena sizes.
    pub memory: MemoryConfig,
    /// Asset lookup.
    pub assets: AssetConfig,
    /// Where game logic comes from.
    pub plugin: PluginConfig,
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Window and framebuffer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title prefix; the FPS readout is appended.
    pub title: String,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Width of the buffer game logic renders into.
    pub framebuffer_width: u32,
    /// Height of the buffer game logic renders into.
    pub framebuffer_height: u32,
}

/// Fixed-timestep loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Game updates per simulated second.
    pub update_hz: u32,
    /// Most updates run for one rendered frame.
    pub max_updates_per_frame: u32,
    /// Frames the loop aims to render per second.
    pub target_fps: u32,
    /// How early (seconds) an update may run relative to a full step.
    pub step_tolerance: f32,
}

/// Arena sizes in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Persistent arena capacity.
    pub persistent_bytes: usize,
    /// Transient arena capacity.
    pub transient_bytes: usize,
}

/// Asset lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory logical asset names resolve against.
    pub root: PathBuf,
}

/// How game logic is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginMode {
    /// Linked into the host binary.
    #[default]
    Static,
    /// Loaded from a library and reloaded when it changes.
    Dynamic,
}

/// Plugin source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Static or dynamic.
    pub mode: PluginMode,
    /// Library watched in dynamic mode.
    pub library: PathBuf,
    /// Where the library is copied before loading, so the build can
    /// overwrite the original while it is in use.
    pub shadow_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            timing: TimingConfig::default(),
            memory: MemoryConfig::default(),
            assets: AssetConfig::default(),
            plugin: PluginConfig::default(),
            log_filter: "info".to_owned(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kiln".to_owned(),
            width: 1024,
            height: 768,
            framebuffer_width: 640,
            framebuffer_height: 480,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            update_hz: 60,
            max_updates_per_frame: 3,
            target_fps: 60,
            step_tolerance: 0.01,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            persistent_bytes: PERSISTENT_MEMORY_SIZE,
            transient_bytes: TRANSIENT_MEMORY_SIZE,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        let file = format!(
            "{}kiln_game{}",
            std::env::consts::DLL_PREFIX,
            std::env::consts::DLL_SUFFIX
        );
        Self {
            mode: PluginMode::Static,
            library: Path::new("target").join("debug").join(file),
            shadow_dir: Path::new("target").join("kiln-shadow"),
        }
    }
}

impl TimingConfig {
    /// Seconds per fixed update.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn timestep(&self) -> f32 {
        1.0 / self.update_hz as f32
    }

    /// Wall-clock budget of one rendered frame.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps))
    }
}

impl HostConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ConfigParse`] for malformed TOML and
    /// [`HostError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str, origin: &Path) -> HostResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| HostError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ConfigRead`] if the file cannot be read, plus
    /// everything [`HostConfig::from_toml_str`] returns.
    pub fn load(path: &Path) -> HostResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HostError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Loads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`HostConfig::load`].
    pub fn discover(explicit: Option<&Path>) -> HostResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    /// Rejects values the host loop cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> HostResult<()> {
        let invalid = |message: String| Err(HostError::InvalidConfig(message));

        if self.timing.update_hz == 0 {
            return invalid("timing.update_hz must be positive".to_owned());
        }
        if self.timing.target_fps == 0 {
            return invalid("timing.target_fps must be positive".to_owned());
        }
        if self.timing.max_updates_per_frame == 0 {
            return invalid("timing.max_updates_per_frame must be positive".to_owned());
        }
        if !(0.0..self.timing.timestep()).contains(&self.timing.step_tolerance) {
            return invalid(format!(
                "timing.step_tolerance {} must lie in [0, {})",
                self.timing.step_tolerance,
                self.timing.timestep()
            ));
        }
        if self.window.framebuffer_width == 0 || self.window.framebuffer_height == 0 {
            return invalid("window framebuffer must be non-empty".to_owned());
        }
        if self.memory.persistent_bytes == 0 || self.memory.transient_bytes == 0 {
            return invalid("memory pools must be non-empty".to_owned());
        }
        let row_bytes = self.window.framebuffer_width as usize * BYTES_PER_PIXEL;
        if self.memory.transient_bytes < row_bytes {
            return invalid(format!(
                "memory.transient_bytes {} cannot hold one {row_bytes}-byte framebuffer row",
                self.memory.transient_bytes
            ));
        }
        Ok(())
    }
}
