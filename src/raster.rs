//! Device primitives a bitmap supplies to the drawing core.
//!
//! The core never touches pixel memory directly. It describes fills with a
//! [`BlitRecord`] (raster op, pattern, colours, clip and a rectangle list)
//! and hands them to a [`Raster`]. Implementors supply pixel access; the
//! fill, set-pixel and block-copy primitives have default implementations
//! built on it that a device may override with faster paths.

use crate::basics::{Point, Rect};
use crate::color::RgbLayout;
use crate::pattern::{pattern_bit, PATTERN_SOLID};
use crate::rect_algebra::{empty_rect, intersect_rect};

// ============================================================================
// Raster ops
// ============================================================================

/// How a source value combines with the destination pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterOp {
    /// dst = src
    #[default]
    Replace,
    /// dst = dst | src
    Or,
    /// dst = dst ^ src
    Xor,
    /// dst = dst & src
    And,
    /// dst = !dst, source ignored
    Invert,
    /// Like `Replace`, but pattern background bits are not drawn.
    Transparent,
}

impl RasterOp {
    /// Combine `src` into `dst`, keeping only the bits in `mask`.
    #[inline]
    pub fn apply(self, dst: u32, src: u32, mask: u32) -> u32 {
        let v = match self {
            RasterOp::Replace | RasterOp::Transparent => src,
            RasterOp::Or => dst | src,
            RasterOp::Xor => dst ^ src,
            RasterOp::And => dst & src,
            RasterOp::Invert => !dst,
        };
        v & mask
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self == RasterOp::Transparent
    }
}

// ============================================================================
// BlitRecord
// ============================================================================

/// A fill request: how to paint and which rectangles to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlitRecord {
    pub rop: RasterOp,
    pub pattern: usize,
    /// Colour for pattern foreground bits.
    pub fore: u32,
    /// Colour for pattern background bits.
    pub back: u32,
    /// Global clip; nothing outside it is written.
    pub clip: Rect,
    pub rects: Vec<Rect>,
}

impl BlitRecord {
    pub fn new(rop: RasterOp, pattern: usize, fore: u32, back: u32, clip: Rect) -> Self {
        Self {
            rop,
            pattern,
            fore,
            back,
            clip,
            rects: Vec::new(),
        }
    }

    /// Solid replace of `color` within `clip`.
    pub fn solid(color: u32, clip: Rect) -> Self {
        Self::new(RasterOp::Replace, PATTERN_SOLID, color, color, clip)
    }

    pub fn with_rects(mut self, rects: Vec<Rect>) -> Self {
        self.rects = rects;
        self
    }

    /// Source value for device pixel `(x, y)`, or `None` if it is skipped.
    #[inline]
    pub fn source_at(&self, x: i32, y: i32) -> Option<u32> {
        if self.rop == RasterOp::Invert {
            return Some(0);
        }
        if pattern_bit(self.pattern, x, y) {
            Some(self.fore)
        } else if self.rop.is_transparent() {
            None
        } else {
            Some(self.back)
        }
    }
}

// ============================================================================
// Raster trait
// ============================================================================

/// Pixel storage plus the primitives the drawing core calls.
pub trait Raster {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Bits per pixel: 1 for monochrome, up to 8 for indexed colour,
    /// 15 or 16 for packed direct colour.
    fn color_bits(&self) -> u32;

    /// Packed layout used when `color_bits() > 8`.
    fn rgb_layout(&self) -> RgbLayout;

    /// Read a pixel. Coordinates outside the bitmap read as 0.
    fn get_pixel(&self, x: i32, y: i32) -> u32;

    /// Combine `value` into the pixel at `(x, y)`. Out-of-range writes are
    /// ignored.
    fn put_pixel(&mut self, x: i32, y: i32, value: u32, rop: RasterOp);

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Mask of valid pixel bits.
    fn pixel_mask(&self) -> u32 {
        match self.color_bits() {
            0 => 0,
            b if b >= 32 => u32::MAX,
            b => (1u32 << b) - 1,
        }
    }

    /// Number of distinct pixel values.
    fn color_count(&self) -> u64 {
        1u64 << self.color_bits().min(32)
    }

    /// Fill every rectangle in `blit`, clipped to its clip and the bitmap.
    fn fill(&mut self, blit: &BlitRecord) {
        let Some(clip) = intersect_rect(&blit.clip, &self.bounds()) else {
            return;
        };
        for r in &blit.rects {
            let Some(r) = intersect_rect(r, &clip) else {
                continue;
            };
            if empty_rect(&r) {
                continue;
            }
            for y in r.ymin..r.ymax {
                for x in r.xmin..r.xmax {
                    if let Some(v) = blit.source_at(x, y) {
                        self.put_pixel(x, y, v, blit.rop);
                    }
                }
            }
        }
    }

    /// Draw one pixel with the settings of `blit`, honouring its clip.
    fn set_pixel(&mut self, blit: &BlitRecord, pt: Point) {
        let c = &blit.clip;
        if pt.x < c.xmin || pt.x >= c.xmax || pt.y < c.ymin || pt.y >= c.ymax {
            return;
        }
        if let Some(v) = blit.source_at(pt.x, pt.y) {
            self.put_pixel(pt.x, pt.y, v, blit.rop);
        }
    }

    /// Copy `src` within this bitmap so its top-left lands on `dst`.
    ///
    /// Source and destination may overlap. Destination pixels outside
    /// `clip` or the bitmap are left alone.
    fn blit_self(&mut self, src: Rect, dst: Point, clip: &Rect) {
        if empty_rect(&src) {
            return;
        }
        let w = src.width();
        let mut staged = Vec::with_capacity(src.area() as usize);
        for y in src.ymin..src.ymax {
            for x in src.xmin..src.xmax {
                staged.push(self.get_pixel(x, y));
            }
        }
        let Some(visible) = intersect_rect(clip, &self.bounds()) else {
            return;
        };
        for (i, v) in staged.into_iter().enumerate() {
            let i = i as i32;
            let (sx, sy) = (src.xmin + i % w, src.ymin + i / w);
            let (dx, dy) = (dst.x + (sx - src.xmin), dst.y + (sy - src.ymin));
            if dx >= visible.xmin && dx < visible.xmax && dy >= visible.ymin && dy < visible.ymax
            {
                self.put_pixel(dx, dy, v, RasterOp::Replace);
            }
        }
    }

    /// Copy `src_rect` of another bitmap to `dst` in this one.
    fn blit_from(
        &mut self,
        src: &dyn Raster,
        src_rect: Rect,
        dst: Point,
        rop: RasterOp,
        clip: &Rect,
    ) {
        let Some(visible) = intersect_rect(clip, &self.bounds()) else {
            return;
        };
        for y in src_rect.ymin..src_rect.ymax {
            let dy = dst.y + (y - src_rect.ymin);
            if dy < visible.ymin || dy >= visible.ymax {
                continue;
            }
            for x in src_rect.xmin..src_rect.xmax {
                let dx = dst.x + (x - src_rect.xmin);
                if dx >= visible.xmin && dx < visible.xmax {
                    self.put_pixel(dx, dy, src.get_pixel(x, y), rop);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grafmap::GrafMap;

    fn make_map(w: i32, h: i32) -> GrafMap {
        GrafMap::new(w, h, 8)
    }

    #[test]
    fn test_rop_apply() {
        assert_eq!(RasterOp::Replace.apply(0x0F, 0xF0, 0xFF), 0xF0);
        assert_eq!(RasterOp::Or.apply(0x0F, 0xF0, 0xFF), 0xFF);
        assert_eq!(RasterOp::Xor.apply(0xFF, 0x0F, 0xFF), 0xF0);
        assert_eq!(RasterOp::And.apply(0x3C, 0x0F, 0xFF), 0x0C);
        assert_eq!(RasterOp::Invert.apply(0x0F, 0, 0xFF), 0xF0);
    }

    #[test]
    fn test_fill_clipped() {
        let mut map = make_map(10, 10);
        let blit = BlitRecord::solid(7, Rect::new(2, 2, 6, 6))
            .with_rects(vec![Rect::new(0, 0, 4, 10)]);
        map.fill(&blit);
        assert_eq!(map.get_pixel(1, 3), 0);
        assert_eq!(map.get_pixel(2, 2), 7);
        assert_eq!(map.get_pixel(3, 5), 7);
        assert_eq!(map.get_pixel(4, 3), 0);
        assert_eq!(map.get_pixel(3, 6), 0);
        assert_eq!(map.count(7), 8);
    }

    #[test]
    fn test_fill_transparent_pattern() {
        let mut map = make_map(8, 2);
        map.clear(9);
        let blit = BlitRecord::new(RasterOp::Transparent, 3, 1, 2, map.bounds())
            .with_rects(vec![Rect::new(0, 0, 8, 1)]);
        map.fill(&blit);
        assert_eq!(map.get_pixel(0, 0), 1);
        assert_eq!(map.get_pixel(1, 0), 9);
    }

    #[test]
    fn test_fill_opaque_pattern_uses_back() {
        let mut map = make_map(8, 1);
        let blit = BlitRecord::new(RasterOp::Replace, 3, 1, 2, map.bounds())
            .with_rects(vec![Rect::new(0, 0, 2, 1)]);
        map.fill(&blit);
        assert_eq!(map.get_pixel(0, 0), 1);
        assert_eq!(map.get_pixel(1, 0), 2);
    }

    #[test]
    fn test_fill_invert_twice_restores() {
        let mut map = make_map(4, 4);
        map.clear(0x35);
        let blit = BlitRecord::new(RasterOp::Invert, 1, 0, 0, map.bounds())
            .with_rects(vec![Rect::new(1, 1, 3, 3)]);
        map.fill(&blit);
        assert_eq!(map.get_pixel(1, 1), 0xCA);
        map.fill(&blit);
        assert_eq!(map.get_pixel(1, 1), 0x35);
    }

    #[test]
    fn test_set_pixel_respects_clip() {
        let mut map = make_map(4, 4);
        let blit = BlitRecord::solid(5, Rect::new(0, 0, 2, 2));
        map.set_pixel(&blit, Point::new(1, 1));
        map.set_pixel(&blit, Point::new(2, 1));
        assert_eq!(map.get_pixel(1, 1), 5);
        assert_eq!(map.get_pixel(2, 1), 0);
    }

    #[test]
    fn test_blit_self_overlapping() {
        let mut map = make_map(6, 1);
        for x in 0..6 {
            map.put_pixel(x, 0, x as u32 + 1, RasterOp::Replace);
        }
        let clip = map.bounds();
        map.blit_self(Rect::new(0, 0, 4, 1), Point::new(2, 0), &clip);
        let row: Vec<u32> = (0..6).map(|x| map.get_pixel(x, 0)).collect();
        assert_eq!(row, vec![1, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn test_blit_from() {
        let mut src = make_map(2, 2);
        src.put_pixel(1, 1, 4, RasterOp::Replace);
        let mut dst = make_map(5, 5);
        let clip = dst.bounds();
        dst.blit_from(&src, src.bounds(), Point::new(3, 3), RasterOp::Replace, &clip);
        assert_eq!(dst.get_pixel(4, 4), 4);
        assert_eq!(dst.get_pixel(3, 3), 0);
    }

    #[test]
    fn test_pixel_mask() {
        assert_eq!(GrafMap::new(1, 1, 1).pixel_mask(), 1);
        assert_eq!(GrafMap::new(1, 1, 8).pixel_mask(), 0xFF);
        assert_eq!(GrafMap::new(1, 1, 16).color_count(), 65536);
    }
}
