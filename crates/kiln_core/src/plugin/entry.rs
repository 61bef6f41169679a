//! The exported entry point of a dynamically loaded plugin.
//!
//! A plugin library exports exactly one symbol, [`ENTRY_SYMBOL`], with the
//! signature [`PluginEntryFn`]. The returned [`PluginEntry`] carries the ABI
//! version the library was built against and an owned plugin instance.
//! Host and plugin must be built by the same toolchain from the same
//! `kiln_core`; the version check catches stale libraries, not foreign ones.

use std::ffi::c_void;

use crate::plugin::contract::GamePlugin;

/// Bumped whenever [`GamePlugin`], [`HostServices`](crate::HostServices) or
/// a type crossing them changes layout.
pub const ABI_VERSION: u32 = 2;

/// NUL-terminated name of the entry symbol.
pub const ENTRY_SYMBOL: &[u8] = b"kiln_plugin_entry\0";

/// Signature of the entry symbol.
pub type PluginEntryFn = extern "C" fn() -> PluginEntry;

/// What the entry symbol returns.
///
/// Leaks the instance if never converted back with
/// [`PluginEntry::into_plugin`].
#[derive(Debug)]
#[repr(C)]
pub struct PluginEntry {
    /// [`ABI_VERSION`] as seen by the library.
    pub abi_version: u32,
    instance: *mut c_void,
}

impl PluginEntry {
    /// Wraps a plugin instance for export.
    #[must_use]
    pub fn new(plugin: Box<dyn GamePlugin>) -> Self {
        Self {
            abi_version: ABI_VERSION,
            instance: Box::into_raw(Box::new(plugin)).cast(),
        }
    }

    /// Takes ownership of the exported instance.
    ///
    /// Returns `None` (leaking the instance) when the ABI versions differ,
    /// since its layout cannot be trusted.
    ///
    /// # Safety
    ///
    /// `self` must come from [`PluginEntry::new`] in a library built against
    /// this `kiln_core`, and that library must stay loaded for as long as
    /// the returned plugin lives.
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn into_plugin(self) -> Option<Box<dyn GamePlugin>> {
        if self.abi_version != ABI_VERSION || self.instance.is_null() {
            return None;
        }
        // SAFETY: `instance` was produced by `Box::into_raw` on a
        // `Box<Box<dyn GamePlugin>>` in `new`, per the caller's contract.
        let outer = unsafe { Box::from_raw(self.instance.cast::<Box<dyn GamePlugin>>()) };
        Some(*outer)
    }
}

/// Exports a plugin factory as the library entry point.
///
/// The factory is any path callable as `fn() -> Box<dyn GamePlugin>`.
///
/// ```ignore
/// kiln_core::export_plugin!(crate::create_plugin);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($factory:path) => {
        /// Entry point resolved by the Kiln host.
        #[allow(unsafe_code)]
        #[no_mangle]
        pub extern "C" fn kiln_plugin_entry() -> $crate::PluginEntry {
            $crate::PluginEntry::new($factory())
        }
    };
}
