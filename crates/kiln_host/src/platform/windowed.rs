//! Desktop window backend: winit for events, pixels for the blit, gilrs
//! for the gamepad.
//!
//! The loop keeps control flow; winit is pumped once per frame with a zero
//! timeout instead of owning the thread.

use std::sync::Arc;
use std::time::Duration;

use kiln_core::FrameSurface;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use super::pad::PadReader;
use super::{HostEvent, Platform};
use crate::config::WindowConfig;
use crate::error::{HostError, HostResult};
use crate::input::{GamepadSample, Key};

/// A winit window showing the framebuffer through pixels.
pub struct WindowedPlatform {
    pixels: Pixels<'static>,
    window: Arc<Window>,
    event_loop: EventLoop<()>,
    pad: PadReader,
}

impl WindowedPlatform {
    /// Opens the window and the framebuffer surface.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Platform`] if the event loop, window or surface
    /// cannot be created.
    pub fn new(config: &WindowConfig) -> HostResult<Self> {
        let event_loop =
            EventLoop::new().map_err(|e| HostError::Platform(format!("event loop: {e}")))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.clone())
                .with_inner_size(LogicalSize::new(
                    f64::from(config.width),
                    f64::from(config.height),
                ))
                .build(&event_loop)
                .map_err(|e| HostError::Platform(format!("window: {e}")))?,
        );

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(config.framebuffer_width, config.framebuffer_height, surface)
            .map_err(|e| HostError::Platform(format!("pixels: {e}")))?;

        tracing::info!(
            width = config.framebuffer_width,
            height = config.framebuffer_height,
            "window opened"
        );
        Ok(Self {
            pixels,
            window,
            event_loop,
            pad: PadReader::new(),
        })
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyD => Key::D,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::KeyR => Key::R,
        KeyCode::F1 => Key::F1,
        _ => return None,
    })
}

impl Platform for WindowedPlatform {
    fn poll_events(&mut self, events: &mut Vec<HostEvent>) {
        let pixels = &mut self.pixels;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| {
                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => events.push(HostEvent::Quit),
                    WindowEvent::Resized(size) => {
                        if let Err(error) = pixels.resize_surface(size.width, size.height) {
                            tracing::warn!(%error, "surface resize failed");
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                repeat: false,
                                ..
                            },
                        ..
                    } => {
                        if let Some(key) = map_key(code) {
                            events.push(HostEvent::Key {
                                key,
                                pressed: state == ElementState::Pressed,
                            });
                        }
                    }
                    _ => {}
                }
            });

        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            events.push(HostEvent::Quit);
        }
    }

    fn sample_gamepad(&mut self) -> Option<GamepadSample> {
        self.pad.sample()
    }

    fn present(&mut self, frame: Option<&FrameSurface>, clear_color: u32) -> HostResult<()> {
        let target = self.pixels.frame_mut();
        match frame {
            Some(frame) if frame.pixels().len() == target.len() => {
                target.copy_from_slice(frame.pixels());
            }
            _ => {
                let bytes = clear_color.to_le_bytes();
                for pixel in target.chunks_exact_mut(4) {
                    pixel.copy_from_slice(&bytes);
                }
            }
        }
        self.pixels
            .render()
            .map_err(|e| HostError::Platform(format!("present: {e}")))
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}
