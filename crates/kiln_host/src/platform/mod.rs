//! # Platform Layer
//!
//! What the host loop needs from the outside world each frame: events, a
//! gamepad reading, and somewhere to show the frame.
//!
//! Two backends:
//! - [`HeadlessPlatform`]: scripted input, recorded output
//! - `WindowedPlatform` (feature `windowed`): winit window, pixels blit,
//!   gilrs gamepad

mod headless;
#[cfg(feature = "windowed")]
mod pad;
#[cfg(feature = "windowed")]
mod windowed;

pub use headless::HeadlessPlatform;
#[cfg(feature = "windowed")]
pub use windowed::WindowedPlatform;

use kiln_core::FrameSurface;

use crate::error::HostResult;
use crate::input::{GamepadSample, Key};

/// An input or lifecycle event delivered to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Window closed or equivalent.
    Quit,
    /// A key went down or up. Repeats are not reported.
    Key {
        /// The key.
        key: Key,
        /// Down if true.
        pressed: bool,
    },
}

/// A backend the host loop runs on.
pub trait Platform {
    /// Appends every event that arrived since the last call.
    fn poll_events(&mut self, events: &mut Vec<HostEvent>);

    /// Reads the connected gamepad, or `None` if there is none.
    fn sample_gamepad(&mut self) -> Option<GamepadSample>;

    /// Shows a frame. `frame` is `None` when no plugin rendered, in which
    /// case the backend shows `clear_color` alone.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Platform`](crate::HostError::Platform) if the
    /// surface cannot be presented.
    fn present(&mut self, frame: Option<&FrameSurface>, clear_color: u32) -> HostResult<()>;

    /// Replaces the window title.
    fn set_title(&mut self, title: &str);
}
