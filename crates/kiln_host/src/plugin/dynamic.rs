//! Hot reload: game logic loaded from a shared library and swapped when the
//! library changes on disk.
//!
//! ```text
//! NoPlugin ──► Loaded ──► (StaleDetected ──► Reloading ──► Loaded)*
//!                                               │
//!                                               └─► NoPlugin (retry next tick)
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use kiln_core::{GamePlugin, PluginEntryFn, ABI_VERSION, ENTRY_SYMBOL};
use libloading::Library;

use super::{PluginProvider, RefreshOutcome};
use crate::error::{HostError, HostResult};

/// Loads game logic from a library and reloads it when its mtime moves.
///
/// The library is copied into `shadow_dir` before loading so the build can
/// replace the original while the copy is mapped.
pub struct DynamicProvider {
    // Field order matters: the plugin's code lives in the library, so the
    // plugin must drop first.
    plugin: Option<Box<dyn GamePlugin>>,
    library: Option<Library>,
    shadow: Option<PathBuf>,
    path: PathBuf,
    shadow_dir: PathBuf,
    label: String,
    loaded_mtime: Option<SystemTime>,
    failed_mtime: Option<SystemTime>,
    failing: bool,
    generation: u64,
}

impl DynamicProvider {
    /// Watches `path`, shadow-copying into `shadow_dir`.
    #[must_use]
    pub fn new(path: &Path, shadow_dir: &Path) -> Self {
        Self {
            plugin: None,
            library: None,
            shadow: None,
            path: path.to_path_buf(),
            shadow_dir: shadow_dir.to_path_buf(),
            label: path.display().to_string(),
            loaded_mtime: None,
            failed_mtime: None,
            failing: false,
            generation: 0,
        }
    }

    /// Number of successful loads so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn modified(&self) -> HostResult<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| self.load_error(e.to_string()))
    }

    fn is_stale(&self) -> bool {
        let current = self.modified().ok();
        if self.library.is_none() {
            // Retry every tick unless this exact build already failed.
            return current.is_none() || current != self.failed_mtime;
        }
        match (current, self.loaded_mtime) {
            (Some(current), Some(loaded)) => current > loaded,
            _ => false,
        }
    }

    fn load_error(&self, reason: String) -> HostError {
        HostError::PluginLoad {
            path: self.path.clone(),
            reason,
        }
    }

    /// Drops the instance, closes the library it came from, then deletes
    /// that library's shadow copy.
    fn unload(&mut self) {
        self.plugin = None;
        self.library = None;
        if let Some(shadow) = self.shadow.take() {
            if let Err(error) = std::fs::remove_file(&shadow) {
                tracing::warn!(%error, shadow = %shadow.display(), "shadow copy not removed");
            }
        }
    }

    fn shadow_copy(&self) -> HostResult<PathBuf> {
        std::fs::create_dir_all(&self.shadow_dir).map_err(|e| self.load_error(e.to_string()))?;
        let stem = self
            .path
            .file_stem()
            .map_or_else(|| "plugin".into(), |s| s.to_string_lossy().into_owned());
        let extension = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let shadow = self
            .shadow_dir
            .join(format!("{stem}-{}{extension}", self.generation + 1));
        std::fs::copy(&self.path, &shadow).map_err(|e| self.load_error(e.to_string()))?;
        Ok(shadow)
    }

    #[allow(unsafe_code)]
    fn load(&mut self) -> HostResult<SystemTime> {
        let modified = self.modified()?;
        let shadow = self.shadow_copy()?;
        self.shadow = Some(shadow.clone());

        // SAFETY: loading runs the library's initializers. The library is a
        // Kiln plugin built against this kiln_core; nothing else is loaded.
        let library = unsafe { Library::new(&shadow) }.map_err(|e| self.load_error(e.to_string()))?;

        // SAFETY: ENTRY_SYMBOL is exported by `export_plugin!` with the
        // `PluginEntryFn` signature.
        let entry_fn: PluginEntryFn = unsafe { library.get::<PluginEntryFn>(ENTRY_SYMBOL) }
            .map(|symbol| *symbol)
            .map_err(|_| HostError::MissingEntry {
                path: self.path.clone(),
                symbol: "kiln_plugin_entry",
            })?;

        let entry = entry_fn();
        if entry.abi_version != ABI_VERSION {
            return Err(HostError::AbiMismatch {
                path: self.path.clone(),
                found: entry.abi_version,
                expected: ABI_VERSION,
            });
        }

        // SAFETY: the entry came from `PluginEntry::new` in `library`, which
        // is stored next to the plugin and outlives it (field order).
        let plugin = unsafe { entry.into_plugin() }.ok_or_else(|| {
            self.load_error("entry point returned no plugin instance".to_owned())
        })?;

        self.library = Some(library);
        self.plugin = Some(plugin);
        self.generation += 1;
        tracing::info!(
            path = %self.path.display(),
            shadow = %shadow.display(),
            generation = self.generation,
            "plugin library loaded"
        );
        Ok(modified)
    }
}

impl PluginProvider for DynamicProvider {
    fn refresh(&mut self) -> RefreshOutcome {
        if !self.is_stale() {
            return RefreshOutcome::Unchanged;
        }

        self.unload();
        match self.load() {
            Ok(modified) => {
                self.loaded_mtime = Some(modified);
                self.failed_mtime = None;
                self.failing = false;
                RefreshOutcome::Loaded
            }
            Err(error) => {
                self.unload();
                let mtime = self.modified().ok();
                if !self.failing || mtime != self.failed_mtime {
                    tracing::error!(%error, "plugin reload failed, running without game logic");
                } else {
                    tracing::trace!(%error, "plugin reload still failing");
                }
                self.failing = true;
                self.failed_mtime = mtime;
                RefreshOutcome::Failed
            }
        }
    }

    fn active(&mut self) -> Option<&mut dyn GamePlugin> {
        self.plugin
            .as_mut()
            .map(|plugin| plugin.as_mut() as &mut dyn GamePlugin)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn hot_reloadable(&self) -> bool {
        true
    }
}

impl Drop for DynamicProvider {
    fn drop(&mut self) {
        self.unload();
    }
}

impl std::fmt::Debug for DynamicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicProvider")
            .field("path", &self.path)
            .field("generation", &self.generation)
            .field("loaded", &self.plugin.is_some())
            .finish_non_exhaustive()
    }
}
