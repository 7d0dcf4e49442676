//! In-memory bitmap.
//!
//! One `u32` per pixel regardless of depth; values are masked to the
//! bitmap's colour bits on write. Used for offscreen composition and as
//! the reference [`Raster`] implementation.

use crate::color::RgbLayout;
use crate::config::GrafixConfig;
use crate::error::{GrafError, Result};
use crate::raster::{RasterOp, Raster};

// ============================================================================
// GrafMap
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrafMap {
    width: i32,
    height: i32,
    color_bits: u32,
    layout: RgbLayout,
    pixels: Vec<u32>,
}

impl GrafMap {
    /// Zero-filled bitmap. Non-positive dimensions produce an empty map.
    pub fn new(width: i32, height: i32, color_bits: u32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            width: w,
            height: h,
            color_bits,
            layout: RgbLayout::default(),
            pixels: vec![0; (w as usize) * (h as usize)],
        }
    }

    /// Direct-colour bitmap with the given packed layout.
    pub fn with_layout(width: i32, height: i32, layout: RgbLayout) -> Self {
        let mut map = Self::new(width, height, layout.bits_per_pixel());
        map.layout = layout;
        map
    }

    /// Bitmap sized for direct colour when `color_bits` exceeds 8, using the
    /// packed layout and allocation limit from `config`.
    pub fn from_config(
        width: i32,
        height: i32,
        color_bits: u32,
        config: &GrafixConfig,
    ) -> Result<Self> {
        let bits = if color_bits > 8 {
            config.rgb_layout.bits_per_pixel()
        } else {
            color_bits
        };
        Self::try_new(width, height, bits, config.rgb_layout, config.max_offscreen_pixels)
    }

    /// Allocate a bitmap, failing instead of aborting when the pixel count
    /// exceeds `max_pixels` or the allocator refuses.
    pub fn try_new(
        width: i32,
        height: i32,
        color_bits: u32,
        layout: RgbLayout,
        max_pixels: usize,
    ) -> Result<Self> {
        let err = || GrafError::OffscreenBitmap { width, height };
        if width <= 0 || height <= 0 {
            return Err(err());
        }
        let n = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= max_pixels)
            .ok_or_else(err)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(n).map_err(|_| err())?;
        pixels.resize(n, 0);
        Ok(Self {
            width,
            height,
            color_bits,
            layout,
            pixels,
        })
    }

    pub fn set_rgb_layout(&mut self, layout: RgbLayout) {
        self.layout = layout;
    }

    /// Set every pixel to `value`.
    pub fn clear(&mut self, value: u32) {
        let v = value & self.pixel_mask();
        self.pixels.iter_mut().for_each(|p| *p = v);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// One row of pixels, or `None` when `y` is outside the bitmap.
    pub fn row(&self, y: i32) -> Option<&[u32]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w)
    }

    /// Number of pixels equal to `value`.
    pub fn count(&self, value: u32) -> usize {
        self.pixels.iter().filter(|&&p| p == value).count()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }
}

impl Raster for GrafMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn color_bits(&self) -> u32 {
        self.color_bits
    }

    fn rgb_layout(&self) -> RgbLayout {
        self.layout
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        self.index(x, y).map_or(0, |i| self.pixels[i])
    }

    fn put_pixel(&mut self, x: i32, y: i32, value: u32, rop: RasterOp) {
        let mask = self.pixel_mask();
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = rop.apply(self.pixels[i], value, mask);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
