//! Integration test for hot reload against the real `kiln_game` library.
//!
//! The library is the `cdylib` cargo builds for `kiln_game` alongside this
//! test binary. A "rebuild" is simulated by copying the same bytes over the
//! watched file and moving its mtime forward.

#![cfg(feature = "hot-reload")]

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use kiln_game::GlobalState;
use kiln_host::platform::HeadlessPlatform;
use kiln_host::plugin::{DynamicProvider, RefreshOutcome};
use kiln_host::{HostConfig, HostLoop, LIVE_CLEAR_COLOR};

const STEP: f32 = 1.0 / 60.0;

fn step() -> Duration {
    Duration::from_secs_f32(STEP)
}

fn temp_dir(tag: &str) -> PathBuf {
    let id = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("kiln_hot_reload_{tag}_{id}"))
}

/// Newest `kiln_game` dynamic library in `dir`, hashed or not.
fn newest_game_library(dir: &Path) -> Option<PathBuf> {
    let prefix = format!("{DLL_PREFIX}kiln_game");
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.ends_with(DLL_SUFFIX)
                && name
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('-'))
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// The game library built for this test run: `target/<profile>/deps` first,
/// then `target/<profile>`.
fn built_game_library() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    newest_game_library(deps).or_else(|| newest_game_library(deps.parent()?))
}

fn state(host: &HostLoop<HeadlessPlatform>) -> GlobalState {
    *host.persistent().borrow().root::<GlobalState>()
}

fn shadow_copies(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

#[test]
fn test_rebuilt_library_resumes_same_state() {
    let Some(built) = built_game_library() else {
        eprintln!("kiln_game dynamic library not found next to the test binary, skipping");
        return;
    };

    let dir = temp_dir("resume");
    std::fs::create_dir_all(&dir).unwrap();
    let watched = dir.join(format!("{DLL_PREFIX}game{DLL_SUFFIX}"));
    let shadow_dir = dir.join("shadow");
    std::fs::copy(&built, &watched).unwrap();

    let provider = DynamicProvider::new(&watched, &shadow_dir);
    let mut host = HostLoop::new(
        HostConfig::default(),
        HeadlessPlatform::new(),
        Box::new(provider),
    )
    .unwrap();
    assert_eq!(host.clear_color(), LIVE_CLEAR_COLOR);

    let first = host.frame(step()).unwrap();
    assert_eq!(first.outcome, RefreshOutcome::Loaded);
    assert_eq!(first.updates, 1);
    assert!(first.rendered);
    assert_eq!(host.frame(step()).unwrap().outcome, RefreshOutcome::Unchanged);
    assert!((state(&host).current_time - 2.0 * STEP).abs() < 1e-6);
    assert_eq!(shadow_copies(&shadow_dir), 1);

    // Same bytes, later mtime: looks like a fresh build.
    let loaded_at = std::fs::metadata(&watched).unwrap().modified().unwrap();
    std::fs::copy(&built, &watched).unwrap();
    OpenOptions::new()
        .write(true)
        .open(&watched)
        .unwrap()
        .set_modified(loaded_at + Duration::from_secs(5))
        .unwrap();

    let reload = host.frame(step()).unwrap();
    assert_eq!(reload.outcome, RefreshOutcome::Loaded);
    assert_eq!(reload.updates, 1);
    assert!(reload.rendered);
    assert!(host.is_plugin_bound());

    // The new instance continued the old state instead of starting over.
    let resumed = state(&host);
    assert!(resumed.initialized());
    assert!((resumed.current_time - 3.0 * STEP).abs() < 1e-6);

    // Only the live library's copy is kept.
    assert_eq!(shadow_copies(&shadow_dir), 1);
    assert_eq!(host.frame(step()).unwrap().outcome, RefreshOutcome::Unchanged);

    drop(host);
    assert_eq!(shadow_copies(&shadow_dir), 0);
    std::fs::remove_dir_all(&dir).ok();
}
