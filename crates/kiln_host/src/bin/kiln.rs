//! # Kiln
//!
//! Runs the reference game, statically linked or hot-reloaded.
//!
//! ## Usage
//!
//! ```bash
//! kiln                                   # window, linked game logic
//! kiln --headless --frames 600           # no window, ten seconds
//! kiln --plugin target/debug/libkiln_game.so   # reload on rebuild
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kiln_host::platform::{HeadlessPlatform, Platform};
use kiln_host::plugin::provider_for;
use kiln_host::{HostConfig, HostLoop, HostResult, PluginMode};

/// Command line flags. Each one overrides the config file.
#[derive(Debug, Parser)]
#[command(name = "kiln", version, about = "Kiln game host")]
struct Cli {
    /// Config file (defaults to ./kiln.toml when present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames.
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Load game logic from this library and reload it when it changes.
    #[arg(long, value_name = "PATH")]
    plugin: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "kiln stopped");
            eprintln!("kiln: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> HostResult<()> {
    let mut config = HostConfig::discover(cli.config.as_deref())?;
    if let Some(library) = cli.plugin {
        config.plugin.mode = PluginMode::Dynamic;
        config.plugin.library = library;
    }
    kiln_host::init_tracing(&config.log_filter)?;

    tracing::info!(
        headless = cli.headless,
        mode = ?config.plugin.mode,
        "starting kiln"
    );

    if cli.headless {
        return drive(config, HeadlessPlatform::new(), cli.frames);
    }
    windowed(config, cli.frames)
}

#[cfg(feature = "windowed")]
fn windowed(config: HostConfig, frames: Option<u64>) -> HostResult<()> {
    let platform = kiln_host::platform::WindowedPlatform::new(&config.window)?;
    drive(config, platform, frames)
}

#[cfg(not(feature = "windowed"))]
fn windowed(_config: HostConfig, _frames: Option<u64>) -> HostResult<()> {
    Err(kiln_host::HostError::WindowUnavailable)
}

fn drive<P: Platform>(config: HostConfig, platform: P, frames: Option<u64>) -> HostResult<()> {
    let provider = provider_for(&config.plugin)?;
    let mut host = HostLoop::new(config, platform, provider)?;
    host.run(frames)?;
    Ok(())
}
