//! # Frame Buffer
//!
//! The color buffer a plugin renders into.
//!
//! Pixels are 4 bytes, red in the lowest byte and alpha in the highest,
//! rows `pitch` bytes apart. Plugins are expected to write opaque alpha.

/// Bytes per pixel in every frame buffer.
pub const BYTES_PER_PIXEL: usize = 4;

/// Packs a color into the frame buffer pixel format.
#[inline]
#[must_use]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// A writable view of a color buffer, borrowed for one render call.
#[derive(Debug)]
pub struct Framebuffer<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Distance between rows in bytes.
    pub pitch: usize,
    /// At least `pitch * height` bytes.
    pub pixels: &'a mut [u8],
}

impl<'a> Framebuffer<'a> {
    /// Wraps a pixel slice.
    ///
    /// # Panics
    ///
    /// Panics if `pitch` cannot hold a row or `pixels` cannot hold every row.
    #[must_use]
    pub fn new(width: u32, height: u32, pitch: usize, pixels: &'a mut [u8]) -> Self {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        assert!(pitch >= row_bytes, "pitch {pitch} shorter than a {width}-pixel row");
        assert!(
            pixels.len() >= pitch * height as usize,
            "{} bytes cannot hold {height} rows of pitch {pitch}",
            pixels.len()
        );
        Self {
            width,
            height,
            pitch,
            pixels,
        }
    }

    /// The visible bytes of row `y` (padding excluded).
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    #[must_use]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of {} rows", self.height);
        let start = y as usize * self.pitch;
        let end = start + self.width as usize * BYTES_PER_PIXEL;
        &mut self.pixels[start..end]
    }

    /// Writes one packed pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn put(&mut self, x: u32, y: u32, color: u32) {
        assert!(x < self.width, "column {x} out of {} columns", self.width);
        let offset = x as usize * BYTES_PER_PIXEL;
        self.row_mut(y)[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.to_le_bytes());
    }

    /// Fills every visible pixel with `color`.
    pub fn fill(&mut self, color: u32) {
        let bytes = color.to_le_bytes();
        for y in 0..self.height {
            for pixel in self.row_mut(y).chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&bytes);
            }
        }
    }
}

/// A host-owned color buffer that lends out [`Framebuffer`] views.
#[derive(Debug, Clone)]
pub struct FrameSurface {
    width: u32,
    height: u32,
    pitch: usize,
    pixels: Vec<u8>,
}

impl FrameSurface {
    /// Allocates a tightly packed surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let pitch = width as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            pitch,
            pixels: vec![0; pitch * height as usize],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Distance between rows in bytes.
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.pitch
    }

    /// Raw pixel bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Reads one packed pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let offset = y as usize * self.pitch + x as usize * BYTES_PER_PIXEL;
        let mut bytes = [0u8; BYTES_PER_PIXEL];
        bytes.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        u32::from_le_bytes(bytes)
    }

    /// Lends the surface out for one render call.
    #[must_use]
    pub fn framebuffer(&mut self) -> Framebuffer<'_> {
        Framebuffer::new(self.width, self.height, self.pitch, &mut self.pixels)
    }
}
