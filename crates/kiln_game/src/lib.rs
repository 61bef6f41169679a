//! # Kiln Game
//!
//! Reference game logic for the Kiln host.
//!
//! Everything the game remembers sits in [`GlobalState`] at the root of the
//! persistent arena. The plugin object itself only holds its bindings, so a
//! freshly loaded build picks up exactly where the old one stopped.
//!
//! Log lines go through [`HostServices::log`](kiln_core::HostServices::log)
//! rather than a logging crate. Loaded as a library, the game would carry
//! its own copy of that crate with no subscriber installed, and the lines
//! would be dropped.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod logic;
pub mod state;

pub use logic::{GameLogic, NOISE_SAMPLE};
pub use state::{GlobalState, MATCH_LENGTH_SECONDS};

use kiln_core::GamePlugin;

/// Creates a fresh, unbound plugin instance.
#[must_use]
pub fn create_plugin() -> Box<dyn GamePlugin> {
    Box::new(GameLogic::new())
}

kiln_core::export_plugin!(create_plugin);
