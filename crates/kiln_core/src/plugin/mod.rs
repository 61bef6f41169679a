//! # Plugin Boundary
//!
//! Everything game logic and the host agree on:
//!
//! - [`GamePlugin`]: what a game module implements
//! - [`HostServices`]: what the host offers back, logging included
//! - [`PluginBindings`]: the Unbound / Bound / Running bookkeeping
//! - [`PluginEntry`]: the one exported symbol a dynamic library provides
//!
//! ## Binding Sequence
//!
//! ```text
//! bind_host ──► bind_persistent ──► bind_transient ──► update / render ...
//!   (Unbound)                            (Bound)            (Running)
//! ```
//!
//! After a reload the host replays the whole sequence against the same
//! arenas. Rebinding never touches arena contents.

mod bindings;
mod contract;
mod entry;

pub use bindings::{BoundRegions, PluginBindings, PluginPhase};
pub use contract::{GamePlugin, HostHandle, HostServices, LogLevel};
pub use entry::{PluginEntry, PluginEntryFn, ABI_VERSION, ENTRY_SYMBOL};
