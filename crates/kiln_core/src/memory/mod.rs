//! # Memory Management
//!
//! Fixed-capacity arenas that replace heap allocation inside game logic.
//!
//! ## Design Philosophy
//!
//! Two pools are reserved once at startup:
//! - **Persistent** - holds the plugin's root state for the whole process
//!   lifetime and survives plugin hot reloads untouched
//! - **Transient** - per-frame scratch, rewound by the host before each frame
//!
//! Nothing is freed individually. Memory is either zeroed and rewound
//! (`reset`) or only rewound (`clear`).

mod arena;

use std::cell::RefCell;
use std::rc::Rc;

pub use arena::MemoryArena;

/// Default persistent pool size: 8 MiB.
pub const PERSISTENT_MEMORY_SIZE: usize = 8 * 1024 * 1024;

/// Default transient pool size: 16 KiB.
pub const TRANSIENT_MEMORY_SIZE: usize = 16 * 1024;

/// A host-owned arena shared with the plugin for the duration of a binding.
///
/// The host keeps the original handle; a plugin only ever holds clones, so
/// dropping or reloading the plugin never releases the memory.
pub type ArenaRef = Rc<RefCell<MemoryArena>>;
