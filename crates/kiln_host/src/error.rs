//! # Host Error Types
//!
//! Everything the host can fail at outside the plugin itself.
//!
//! None of these are raised for arena overflow: that is a fatal panic inside
//! `kiln_core`, not a condition the host recovers from.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the host.
#[derive(Error, Debug)]
pub enum HostError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`HostConfig`](crate::HostConfig).
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: toml::de::Error,
    },

    /// A config value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The plugin library could not be copied or opened.
    #[error("failed to load plugin library {}: {reason}", .path.display())]
    PluginLoad {
        /// Library path.
        path: PathBuf,
        /// Loader failure.
        reason: String,
    },

    /// The library does not export the entry symbol.
    #[error("plugin library {} does not export {symbol}", .path.display())]
    MissingEntry {
        /// Library path.
        path: PathBuf,
        /// Symbol that was looked up.
        symbol: &'static str,
    },

    /// The library was built against a different plugin ABI.
    #[error("plugin library {} has ABI {found}, host expects {expected}", .path.display())]
    AbiMismatch {
        /// Library path.
        path: PathBuf,
        /// ABI version reported by the library.
        found: u32,
        /// ABI version the host was built with.
        expected: u32,
    },

    /// The plugin's root state does not fit the persistent arena.
    #[error("plugin state needs {required} bytes, persistent arena holds {capacity}")]
    StateTooLarge {
        /// Bytes the plugin asked for.
        required: usize,
        /// Persistent arena capacity.
        capacity: usize,
    },

    /// Dynamic plugins were requested but the binary has no loader.
    #[error("dynamic plugin mode requires the `hot-reload` feature")]
    HotReloadUnavailable,

    /// A window was requested but the binary has no windowed backend.
    #[error("windowed mode requires the `windowed` feature; pass --headless")]
    WindowUnavailable,

    /// Window, surface or event loop failure.
    #[error("platform failure: {0}")]
    Platform(String),

    /// The log subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
