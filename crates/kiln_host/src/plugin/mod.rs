//! # Plugin Providers
//!
//! Where the loop gets its [`GamePlugin`] from. A provider is asked once per
//! tick whether anything changed; when it reports [`RefreshOutcome::Loaded`]
//! the loop rebinds the new instance to the same arenas.
//!
//! A provider never touches the arenas itself, so a failed load cannot
//! corrupt game state.

#[cfg(feature = "hot-reload")]
mod dynamic;
mod static_provider;

#[cfg(feature = "hot-reload")]
pub use dynamic::DynamicProvider;
pub use static_provider::StaticProvider;

use kiln_core::GamePlugin;

use crate::config::{PluginConfig, PluginMode};
use crate::error::HostResult;

/// Result of one refresh check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Same plugin as last tick (or still none).
    Unchanged,
    /// A new instance is active and must be bound.
    Loaded,
    /// A load was attempted and failed; no plugin is active.
    Failed,
}

/// A source of game logic.
pub trait PluginProvider {
    /// Checks for a new plugin and swaps it in.
    fn refresh(&mut self) -> RefreshOutcome;

    /// The current instance, if any.
    fn active(&mut self) -> Option<&mut dyn GamePlugin>;

    /// Human-readable origin, for logs.
    fn label(&self) -> &str;

    /// True if the plugin can change while the loop runs.
    fn hot_reloadable(&self) -> bool {
        false
    }
}

/// Builds the provider the config asks for.
///
/// # Errors
///
/// Returns [`HostError::HotReloadUnavailable`] for dynamic mode in a build
/// without the `hot-reload` feature.
pub fn provider_for(config: &PluginConfig) -> HostResult<Box<dyn PluginProvider>> {
    match config.mode {
        PluginMode::Static => Ok(Box::new(StaticProvider::new(
            "kiln_game",
            kiln_game::create_plugin,
        ))),
        #[cfg(feature = "hot-reload")]
        PluginMode::Dynamic => Ok(Box::new(DynamicProvider::new(
            &config.library,
            &config.shadow_dir,
        ))),
        #[cfg(not(feature = "hot-reload"))]
        PluginMode::Dynamic => Err(crate::error::HostError::HotReloadUnavailable),
    }
}
