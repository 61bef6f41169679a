//! # Kiln Host
//!
//! The platform layer that runs Kiln game logic.
//!
//! ## Responsibilities
//!
//! 1. **Owns the arenas** - both pools are allocated once and outlive every
//!    plugin instance
//! 2. **Feeds one controller** - keyboard and gamepad merged, gamepad last
//! 3. **Keeps time** - fixed updates, at most three per rendered frame
//! 4. **Swaps logic live** - a rebuilt plugin is rebound to the same arenas
//!
//! ## Example
//!
//! ```rust
//! use kiln_host::platform::HeadlessPlatform;
//! use kiln_host::plugin::StaticProvider;
//! use kiln_host::{HostConfig, HostLoop};
//! use std::time::Duration;
//!
//! let provider = StaticProvider::new("kiln_game", kiln_game::create_plugin);
//! let mut host = HostLoop::new(
//!     HostConfig::default(),
//!     HeadlessPlatform::new(),
//!     Box::new(provider),
//! )?;
//! let report = host.frame(Duration::from_secs_f32(1.0 / 60.0))?;
//! assert_eq!(report.updates, 1);
//! assert!(report.rendered);
//! # Ok::<(), kiln_host::HostError>(())
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod assets;
pub mod audio;
pub mod config;
pub mod error;
pub mod host_loop;
pub mod input;
pub mod platform;
pub mod plugin;

pub use assets::{AssetHost, GAME_LOG_TARGET};
pub use audio::{SoundBank, SoundData, VoiceState};
pub use config::{HostConfig, PluginMode, DEFAULT_CONFIG_FILE};
pub use error::{HostError, HostResult};
pub use host_loop::{
    FixedStep, FpsCounter, FrameReport, HostLoop, LIVE_CLEAR_COLOR, STATIC_CLEAR_COLOR,
};

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (usually the
/// config's `log_filter`) is used.
///
/// # Errors
///
/// Returns [`HostError::Logging`] if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> HostResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HostError::Logging(e.to_string()))
}
