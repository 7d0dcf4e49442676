//! Packed RGB pixel layouts.
//!
//! Direct-colour bitmaps store 15- or 16-bit packed pixels. The layout is a
//! property of each bitmap rather than a build setting.

use serde::Deserialize;

/// Bit layout of a packed direct-colour pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RgbLayout {
    /// `0rrrrrgg gggbbbbb`
    Rgb555,
    /// `rrrrrggg gggbbbbb`
    #[default]
    Rgb565,
}

impl RgbLayout {
    #[inline]
    fn green_bits(self) -> u32 {
        match self {
            RgbLayout::Rgb555 => 5,
            RgbLayout::Rgb565 => 6,
        }
    }

    /// Bits per pixel for bitmaps using this layout.
    pub fn bits_per_pixel(self) -> u32 {
        10 + self.green_bits()
    }

    /// Split a pixel into its red, green and blue fields.
    #[inline]
    pub fn unpack(self, pixel: u32) -> (u32, u32, u32) {
        let g = self.green_bits();
        let r = (pixel >> (5 + g)) & 0x1F;
        let gg = (pixel >> 5) & ((1 << g) - 1);
        let b = pixel & 0x1F;
        (r, gg, b)
    }

    /// Recombine fields; out-of-range fields are masked.
    #[inline]
    pub fn pack(self, r: u32, g: u32, b: u32) -> u32 {
        let gb = self.green_bits();
        ((r & 0x1F) << (5 + gb)) | ((g & ((1 << gb) - 1)) << 5) | (b & 0x1F)
    }

    /// Channel-wise mean of `pixels`, each channel truncated.
    ///
    /// Returns `None` for an empty input.
    pub fn average<I>(self, pixels: I) -> Option<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
        for p in pixels {
            let (pr, pg, pb) = self.unpack(p);
            r += pr as u64;
            g += pg as u64;
            b += pb as u64;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(self.pack((r / n) as u32, (g / n) as u32, (b / n) as u32))
    }
}

// ============================================================================
// Tests
// ============================================================================
