//! # Kiln Core
//!
//! The contract shared by the Kiln host and the game logic it loads:
//! - Fixed-capacity arenas that hold all game state
//! - The controller value type and its merge protocol
//! - The plugin boundary, stable across hot reloads
//!
//! ## Memory Rules
//!
//! 1. **Game state lives in the persistent arena** - flat bytes, no pointers
//! 2. **Scratch lives in the transient arena** - rewound every frame
//! 3. **Overflow is fatal** - a blown budget is a sizing bug, not a runtime case
//!
//! ## Example
//!
//! ```rust
//! use kiln_core::MemoryArena;
//!
//! let mut arena = MemoryArena::new(1024);
//! let scratch = arena.allocate(600);
//! assert!(scratch.iter().all(|&b| b == 0));
//! assert_eq!(arena.remaining(), 424);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod asset;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod memory;
pub mod plugin;

pub use asset::{Image, SoundCommand, SoundHandle, SoundSample};
pub use error::{ArenaError, ArenaResult, AssetError, AssetResult};
pub use framebuffer::{pack_rgba, FrameSurface, Framebuffer, BYTES_PER_PIXEL};
pub use input::{
    digital_axis, map_axis_value, map_trigger_value, Button, ControllerSnapshot, ControllerState,
};
pub use memory::{
    ArenaRef, MemoryArena, PERSISTENT_MEMORY_SIZE, TRANSIENT_MEMORY_SIZE,
};
pub use plugin::{
    BoundRegions, GamePlugin, HostHandle, HostServices, LogLevel, PluginBindings, PluginEntry,
    PluginEntryFn, PluginPhase, ABI_VERSION, ENTRY_SYMBOL,
};
