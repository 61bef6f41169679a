//! A platform with no window: input is scripted, output is recorded.

use std::collections::VecDeque;

use kiln_core::FrameSurface;

use super::{HostEvent, Platform};
use crate::error::HostResult;
use crate::input::GamepadSample;

/// Scripted backend for tests and `--headless` runs.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<HostEvent>>,
    gamepad: Option<GamepadSample>,
    presented: u64,
    rendered: u64,
    last_clear: Option<u32>,
    last_frame: Vec<u8>,
    title: String,
}

impl HeadlessPlatform {
    /// Creates a backend with an empty script and no gamepad.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the events delivered by one future `poll_events` call.
    pub fn push_events(&mut self, events: Vec<HostEvent>) {
        self.script.push_back(events);
    }

    /// Connects (`Some`) or disconnects (`None`) the scripted gamepad.
    pub fn set_gamepad(&mut self, reading: Option<GamepadSample>) {
        self.gamepad = reading;
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn presented(&self) -> u64 {
        self.presented
    }

    /// Presented frames that carried plugin output.
    #[must_use]
    pub const fn rendered(&self) -> u64 {
        self.rendered
    }

    /// Clear color of the latest present.
    #[must_use]
    pub const fn last_clear(&self) -> Option<u32> {
        self.last_clear
    }

    /// Pixels of the latest rendered frame, empty if none was rendered.
    #[must_use]
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    /// Latest title set by the loop.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self, events: &mut Vec<HostEvent>) {
        if let Some(scripted) = self.script.pop_front() {
            events.extend(scripted);
        }
    }

    fn sample_gamepad(&mut self) -> Option<GamepadSample> {
        self.gamepad
    }

    fn present(&mut self, frame: Option<&FrameSurface>, clear_color: u32) -> HostResult<()> {
        self.presented += 1;
        self.last_clear = Some(clear_color);
        if let Some(frame) = frame {
            self.rendered += 1;
            self.last_frame.clear();
            self.last_frame.extend_from_slice(frame.pixels());
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }
}
