//! A plugin linked into the host binary.

use kiln_core::GamePlugin;

use super::{PluginProvider, RefreshOutcome};

/// Creates its plugin once from a linked factory and never reloads.
pub struct StaticProvider {
    label: String,
    factory: fn() -> Box<dyn GamePlugin>,
    plugin: Option<Box<dyn GamePlugin>>,
}

impl StaticProvider {
    /// Wraps a factory. The plugin is created on the first refresh.
    #[must_use]
    pub fn new(label: &str, factory: fn() -> Box<dyn GamePlugin>) -> Self {
        Self {
            label: label.to_owned(),
            factory,
            plugin: None,
        }
    }
}

impl PluginProvider for StaticProvider {
    fn refresh(&mut self) -> RefreshOutcome {
        if self.plugin.is_some() {
            return RefreshOutcome::Unchanged;
        }
        self.plugin = Some((self.factory)());
        tracing::info!(plugin = %self.label, "static plugin created");
        RefreshOutcome::Loaded
    }

    fn active(&mut self) -> Option<&mut dyn GamePlugin> {
        self.plugin
            .as_mut()
            .map(|plugin| plugin.as_mut() as &mut dyn GamePlugin)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticProvider")
            .field("label", &self.label)
            .field("created", &self.plugin.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_once() {
        let mut provider = StaticProvider::new("game", kiln_game::create_plugin);
        assert!(provider.active().is_none());
        assert_eq!(provider.refresh(), RefreshOutcome::Loaded);
        assert_eq!(provider.refresh(), RefreshOutcome::Unchanged);
        assert!(provider.active().is_some());
        assert!(!provider.hot_reloadable());
        assert_eq!(provider.label(), "game");
    }
}
