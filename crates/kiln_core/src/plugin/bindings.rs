//! Binding bookkeeping shared by plugin implementations.

use std::cell::RefCell;

use crate::memory::{ArenaRef, MemoryArena};
use crate::plugin::contract::{HostHandle, HostServices};

/// Where a plugin is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPhase {
    /// At least one of host, persistent or transient is missing.
    Unbound,
    /// Everything supplied, no tick run yet since the last bind.
    Bound,
    /// At least one update or render ran since the last bind.
    Running,
}

/// The three things a plugin is bound to, plus phase tracking.
///
/// Plugins embed one of these and call [`PluginBindings::enter`] at the top
/// of `update` and `render`.
#[derive(Default)]
pub struct PluginBindings {
    host: Option<HostHandle>,
    persistent: Option<ArenaRef>,
    transient: Option<ArenaRef>,
    running: bool,
}

/// Borrowed view of a fully bound plugin's regions.
pub struct BoundRegions<'a> {
    /// Host services.
    pub host: &'a dyn HostServices,
    /// Durable state.
    pub persistent: &'a RefCell<MemoryArena>,
    /// Per-frame scratch.
    pub transient: &'a RefCell<MemoryArena>,
}

impl PluginBindings {
    /// Creates unbound bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the host handle.
    pub fn bind_host(&mut self, host: HostHandle) {
        self.host = Some(host);
        self.running = false;
    }

    /// Records the persistent arena.
    pub fn bind_persistent(&mut self, arena: ArenaRef) {
        self.persistent = Some(arena);
        self.running = false;
    }

    /// Records the transient arena.
    pub fn bind_transient(&mut self, arena: ArenaRef) {
        self.transient = Some(arena);
        self.running = false;
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> PluginPhase {
        match (&self.host, &self.persistent, &self.transient) {
            (Some(_), Some(_), Some(_)) if self.running => PluginPhase::Running,
            (Some(_), Some(_), Some(_)) => PluginPhase::Bound,
            _ => PluginPhase::Unbound,
        }
    }

    /// Marks the plugin running and returns its regions.
    ///
    /// # Panics
    ///
    /// Panics if any of host, persistent or transient has not been bound.
    pub fn enter(&mut self) -> BoundRegions<'_> {
        assert!(
            self.phase() != PluginPhase::Unbound,
            "plugin entered before host, persistent and transient were bound"
        );
        self.running = true;
        let (Some(host), Some(persistent), Some(transient)) =
            (&self.host, &self.persistent, &self.transient)
        else {
            unreachable!("phase checked above");
        };
        BoundRegions {
            host: host.as_ref(),
            persistent: persistent.as_ref(),
            transient: transient.as_ref(),
        }
    }
}

impl std::fmt::Debug for PluginBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBindings")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
