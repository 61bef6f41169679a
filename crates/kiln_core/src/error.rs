//! # Core Error Types
//!
//! Errors raised by the arena and by asset services.

use thiserror::Error;

/// Errors that can occur when carving memory out of an arena.
///
/// Overflow is reported as a value only by [`MemoryArena::try_allocate`];
/// [`MemoryArena::allocate`] turns it into a panic.
///
/// [`MemoryArena::try_allocate`]: crate::MemoryArena::try_allocate
/// [`MemoryArena::allocate`]: crate::MemoryArena::allocate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The request does not fit in the remaining capacity.
    #[error("arena overflow: requested {requested} bytes with {used} of {capacity} in use")]
    Overflow {
        /// Bytes requested.
        requested: usize,
        /// Bytes already handed out.
        used: usize,
        /// Total capacity of the arena.
        capacity: usize,
    },
}

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Errors that can occur while loading an asset on behalf of a plugin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// No file exists under the asset root for this logical name.
    #[error("asset not found: {name}")]
    NotFound {
        /// Logical asset name as requested by the plugin.
        name: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read asset {name}: {reason}")]
    Io {
        /// Logical asset name.
        name: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The file was read but its contents could not be decoded.
    #[error("failed to decode asset {name}: {reason}")]
    Decode {
        /// Logical asset name.
        name: String,
        /// Decoder failure.
        reason: String,
    },
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
