//! Pixel access for the auto-tracer.
//!
//! - `PixelSource`: bounded, read-only RGB access by `(column, row)`.
//! - `RgbBuffer`: owned in-memory raster, handy for synthetic inputs.
//! - `load_rgba_image`: decode a PNG/JPEG/BMP/GIF from disk.
use std::path::Path;

use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};
use tracing::debug;

use crate::core::color::Rgb;
use crate::error::{DigitizerError, DigitizerResult};

/// Read-only pixel access over a `width x height` raster.
///
/// `color_at` returns `None` for positions without readable data; the
/// tracer skips those pixels.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn color_at(&self, column: u32, row: u32) -> Option<Rgb>;
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    // alpha is ignored
    fn color_at(&self, column: u32, row: u32) -> Option<Rgb> {
        self.get_pixel_checked(column, row)
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color_at(&self, column: u32, row: u32) -> Option<Rgb> {
        self.get_pixel_checked(column, row)
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
    }
}

impl PixelSource for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn color_at(&self, column: u32, row: u32) -> Option<Rgb> {
        if !self.in_bounds(column, row) {
            return None;
        }
        let p = self.get_pixel(column, row);
        Some(Rgb::new(p.0[0], p.0[1], p.0[2]))
    }
}

/// Owned row-major RGB raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbBuffer {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl RgbBuffer {
    /// Creates a buffer filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![background; len],
        }
    }

    #[must_use]
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for column in 0..width {
                data.push(f(column, row));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Writes one pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, column: u32, row: u32, color: Rgb) {
        if let Some(i) = self.index(column, row) {
            self.data[i] = color;
        }
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        (column < self.width && row < self.height)
            .then(|| row as usize * self.width as usize + column as usize)
    }
}

impl PixelSource for RgbBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, column: u32, row: u32) -> Option<Rgb> {
        self.index(column, row).map(|i| self.data[i])
    }
}

/// Decodes an image file into an RGBA buffer.
pub fn load_rgba_image(path: &Path) -> DigitizerResult<RgbaImage> {
    let image = image::open(path)
        .map_err(|e| DigitizerError::Image(format!("failed to open {}: {e}", path.display())))?
        .into_rgba8();
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded chart image"
    );
    Ok(image)
}
