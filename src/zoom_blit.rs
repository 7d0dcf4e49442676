//! Resampling block copy.
//!
//! A source rectangle is mapped onto a destination rectangle of any size.
//! Each axis is cut into `min(src, dst)` macro-pixels; along that axis one
//! side advances one pixel per macro-pixel and the other a fractional
//! step, accumulated in floating point and truncated only at each
//! boundary. Every destination macro-pixel receives one value:
//!
//! - a single covered source pixel is sampled directly,
//! - indexed sources (8 bits or fewer) take the most frequent colour,
//! - packed RGB sources take the per-channel mean.
//!
//! The result is built in an offscreen bitmap seeded with the current
//! destination pixels and copied back in one block, so a destination that
//! overlaps its source never reads its own output.

use std::ops::Range;

use crate::basics::Rect;
use crate::context::GrafContext;
use crate::error::Result;
use crate::grafmap::GrafMap;
use crate::port::Port;
use crate::raster::{Raster, RasterOp};

// ============================================================================
// Macro-pixel grid
// ============================================================================

/// One macro-pixel along an axis: the source span and the destination
/// span it maps to, both relative to their rectangle's edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSpan {
    pub src: Range<i32>,
    pub dst: Range<i32>,
}

/// Split an axis of `src` source pixels and `dst` destination pixels into
/// macro-pixels. Empty when either span is not positive.
pub fn macro_grid(src: i32, dst: i32) -> Vec<MacroSpan> {
    if src <= 0 || dst <= 0 {
        return Vec::new();
    }
    let count = src.min(dst);
    let sstep = src as f64 / count as f64;
    let dstep = dst as f64 / count as f64;
    let edge = |i: i32, step: f64, span: i32| {
        if i == count {
            span
        } else {
            ((i as f64 * step) as i32).min(span)
        }
    };
    (0..count)
        .map(|i| MacroSpan {
            src: edge(i, sstep, src)..edge(i + 1, sstep, src),
            dst: edge(i, dstep, dst)..edge(i + 1, dstep, dst),
        })
        .collect()
}

// ============================================================================
// Colour reduction
// ============================================================================

/// Most frequent value; ties go to the value seen first.
fn histogram_mode<I>(pixels: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    let mut counts: Vec<(u32, u32)> = Vec::new();
    for p in pixels {
        match counts.iter_mut().find(|(v, _)| *v == p) {
            Some((_, n)) => *n += 1,
            None => counts.push((p, 1)),
        }
    }
    let mut best: Option<(u32, u32)> = None;
    for &(v, n) in &counts {
        if best.map_or(true, |(_, bn)| n > bn) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}

/// Settings shared by every macro-pixel of one zoom.
struct Reducer {
    rop: RasterOp,
    fore: u32,
    back: u32,
}

impl Reducer {
    /// Value for the source block `xs` x `ys`, or `None` to leave the
    /// destination untouched.
    fn reduce(&self, src: &dyn Raster, xs: Range<i32>, ys: Range<i32>) -> Option<u32> {
        let transparent = self.rop.is_transparent();
        let area = (xs.end - xs.start) as i64 * (ys.end - ys.start) as i64;
        let block = || {
            let xs = xs.clone();
            ys.clone()
                .flat_map(move |y| xs.clone().map(move |x| src.get_pixel(x, y)))
        };

        if src.color_bits() == 1 {
            let bit = if area <= 1 {
                src.get_pixel(xs.start, ys.start)
            } else {
                histogram_mode(block()).unwrap_or(0)
            };
            return match (bit != 0, transparent) {
                (true, _) => Some(self.fore),
                (false, true) => None,
                (false, false) => Some(self.back),
            };
        }

        if area <= 1 {
            return Some(src.get_pixel(xs.start, ys.start));
        }
        if src.color_bits() <= 8 {
            let back = self.back;
            let mode = if transparent {
                histogram_mode(block().filter(|&p| p != back))
            } else {
                histogram_mode(block())
            };
            return Some(mode.unwrap_or(back));
        }
        src.rgb_layout().average(block())
    }
}

// ============================================================================
// Zoom blit
// ============================================================================

impl<R: Raster> GrafContext<R> {
    /// Resample `src_rect` of this bitmap, given in `src_port`'s user space,
    /// onto `dst_rect` in the current port.
    ///
    /// Fails without drawing anything when the offscreen bitmap cannot be
    /// allocated.
    pub fn zoom_blit(&mut self, src_port: &Port, src_rect: Rect, dst_rect: Rect) -> Result<()> {
        let sr = self.zoom_source(src_port, src_rect);
        let off = {
            let src: &dyn Raster = &self.raster;
            self.zoom_offscreen(src, sr, dst_rect)?
        };
        self.zoom_composite(off);
        Ok(())
    }

    /// Like [`zoom_blit`](Self::zoom_blit) with the source pixels taken
    /// from another bitmap.
    pub fn zoom_blit_from(
        &mut self,
        src: &dyn Raster,
        src_port: &Port,
        src_rect: Rect,
        dst_rect: Rect,
    ) -> Result<()> {
        let sr = self.zoom_source(src_port, src_rect);
        let off = self.zoom_offscreen(src, sr, dst_rect)?;
        self.zoom_composite(off);
        Ok(())
    }

    fn zoom_source(&self, src_port: &Port, src_rect: Rect) -> Rect {
        let mut sr = self.port_to_global_rect(src_port, src_rect);
        *sr.normalize()
    }

    /// Render the resampled block into a fresh offscreen bitmap placed at
    /// the global destination rectangle. `None` when there is nothing to
    /// draw.
    fn zoom_offscreen(
        &self,
        src: &dyn Raster,
        sr: Rect,
        dst_rect: Rect,
    ) -> Result<Option<(GrafMap, Rect)>> {
        let mut dr = self.xform.user_to_global_rect(dst_rect, false, &self.errors);
        dr.normalize();
        let (sw, sh, dw, dh) = (sr.width(), sr.height(), dr.width(), dr.height());
        if sw <= 0 || sh <= 0 || dw <= 0 || dh <= 0 {
            return Ok(None);
        }
        log::debug!("zoom blit {}x{} -> {}x{}", sw, sh, dw, dh);

        let mut off = GrafMap::try_new(
            dw,
            dh,
            self.raster.color_bits(),
            self.raster.rgb_layout(),
            self.config.max_offscreen_pixels,
        )
        .map_err(|e| {
            self.errors.post(e.clone());
            e
        })?;
        for y in 0..dh {
            for x in 0..dw {
                let v = self.raster.get_pixel(dr.xmin + x, dr.ymin + y);
                off.put_pixel(x, y, v, RasterOp::Replace);
            }
        }

        let pen = &self.port.pen;
        let reducer = Reducer {
            rop: pen.mode,
            fore: pen.color,
            back: self.port.back_color,
        };
        let cols = macro_grid(sw, dw);
        let rows = macro_grid(sh, dh);
        for row in &rows {
            let ys = sr.ymin + row.src.start..sr.ymin + row.src.end;
            for col in &cols {
                let xs = sr.xmin + col.src.start..sr.xmin + col.src.end;
                let Some(v) = reducer.reduce(src, xs, ys.clone()) else {
                    continue;
                };
                for y in row.dst.clone() {
                    for x in col.dst.clone() {
                        off.put_pixel(x, y, v, reducer.rop);
                    }
                }
            }
        }
        Ok(Some((off, dr)))
    }

    fn zoom_composite(&mut self, off: Option<(GrafMap, Rect)>) {
        let Some((off, dr)) = off else {
            return;
        };
        let clip = self.global_clip();
        let whole = Rect::new(0, 0, off.width(), off.height());
        self.raster
            .blit_from(&off, whole, dr.min_corner(), RasterOp::Replace, &clip);
    }
}

// ============================================================================
// Tests
// ============================================================================
