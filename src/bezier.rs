//! Cubic bezier flattening and drawing.
//!
//! Control points come in runs of `3n + 1`; curve `i` uses points
//! `3i ..= 3i + 3`, so neighbouring curves share an end point. Each curve
//! is split by de Casteljau midpoint subdivision to a fixed depth chosen
//! from how far its control points spread, between 0 (a straight chord)
//! and 6 (64 segments).

use crate::basics::{DrawAction, Point};
use crate::context::GrafContext;
use crate::error::{GrafError, Result, Severity};
use crate::raster::Raster;

/// Deepest subdivision used for a single curve.
pub const MAX_BEZIER_DEPTH: u32 = 6;

// ============================================================================
// Depth selection
// ============================================================================

#[inline]
fn deviation(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Subdivision depth for the curve `ctrl[0..4]`.
///
/// Short handles make the curve a chord. Otherwise the depth grows with
/// the largest spread among the chord and the two handles.
pub fn bezier_depth(ctrl: &[Point]) -> u32 {
    let handles = deviation(ctrl[0], ctrl[1]).max(deviation(ctrl[2], ctrl[3]));
    if handles < 4 {
        return 0;
    }
    match handles.max(deviation(ctrl[0], ctrl[3])) {
        d if d < 8 => 1,
        d if d < 16 => 2,
        d if d < 32 => 3,
        d if d < 128 => 4,
        d if d < 512 => 5,
        _ => MAX_BEZIER_DEPTH,
    }
}

// ============================================================================
// Flattening
// ============================================================================

#[derive(Clone, Copy)]
struct Pt {
    x: f64,
    y: f64,
}

impl Pt {
    fn of(p: Point) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }

    fn mid(self, o: Pt) -> Pt {
        Pt {
            x: (self.x + o.x) / 2.0,
            y: (self.y + o.y) / 2.0,
        }
    }

    fn round(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

fn push_distinct(out: &mut Vec<Point>, p: Point) {
    if out.last() != Some(&p) {
        out.push(p);
    }
}

fn subdivide(out: &mut Vec<Point>, p1: Pt, p2: Pt, p3: Pt, p4: Pt, depth: u32) {
    if depth == 0 {
        push_distinct(out, p4.round());
        return;
    }
    let p12 = p1.mid(p2);
    let p23 = p2.mid(p3);
    let p34 = p3.mid(p4);
    let p123 = p12.mid(p23);
    let p234 = p23.mid(p34);
    let p1234 = p123.mid(p234);
    subdivide(out, p1, p12, p123, p1234, depth - 1);
    subdivide(out, p1234, p234, p34, p4, depth - 1);
}

/// Flatten a run of cubic curves into a polyline.
///
/// The output starts with the first control point and repeats no point
/// twice in a row. Fails if `ctrl` is not `3n + 1` points (n >= 1) or if
/// the worst-case output would exceed `max_points`.
pub fn flatten_beziers(ctrl: &[Point], max_points: usize) -> Result<Vec<Point>> {
    if ctrl.len() < 4 || (ctrl.len() - 1) % 3 != 0 {
        return Err(GrafError::ControlPointCount { count: ctrl.len() });
    }
    let depths: Vec<u32> = ctrl.windows(4).step_by(3).map(bezier_depth).collect();
    let needed = 1 + depths.iter().map(|&d| 1usize << d).sum::<usize>();
    if needed > max_points {
        return Err(GrafError::BezierBuffer { points: needed });
    }
    let mut out = Vec::new();
    out.try_reserve_exact(needed)
        .map_err(|_| GrafError::BezierBuffer { points: needed })?;

    out.push(ctrl[0]);
    for (c, depth) in ctrl.windows(4).step_by(3).zip(depths) {
        let [p1, p2, p3, p4] = [c[0], c[1], c[2], c[3]].map(Pt::of);
        subdivide(&mut out, p1, p2, p3, p4, depth);
    }
    log::trace!("flattened {} control points to {}", ctrl.len(), out.len());
    Ok(out)
}

// ============================================================================
// Drawing
// ============================================================================

impl<R: Raster> GrafContext<R> {
    fn flatten_user(&self, ctrl: &[Point], frame: bool) -> Result<Vec<Point>> {
        let global: Vec<Point> = ctrl
            .iter()
            .map(|&p| self.xform.user_to_global_point(p, frame, &self.errors))
            .collect();
        flatten_beziers(&global, self.config.max_bezier_points).map_err(|e| {
            if e.severity() == Severity::Exhausted {
                self.errors.post(e.clone());
            }
            e
        })
    }

    /// Draw a run of cubic curves given in user space.
    ///
    /// Frame outlines the curve and closes it back to its start. Other
    /// actions fill the closed shape with the port's fill rule.
    pub fn bezier_draw(&mut self, action: DrawAction, ctrl: &[Point], pattern: usize) -> Result<()> {
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let frame = action == DrawAction::Frame;
        let mut pts = self.flatten_user(ctrl, frame)?;
        let mut blit = self.blit_record(action, pattern);
        if frame {
            if let (Some(&first), Some(&last)) = (pts.first(), pts.last()) {
                if first != last {
                    pts.push(first);
                }
            }
            self.polyline_global(&mut blit, &pts, true);
        } else {
            let rule = self.port.fill_rule;
            self.fill_global_polygon(&pts, rule, &mut blit);
        }
        Ok(())
    }

    /// Draw a run of cubic curves as an open line with the pen.
    pub fn bezier_polyline(&mut self, ctrl: &[Point]) -> Result<()> {
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let pts = self.flatten_user(ctrl, true)?;
        if let Some(&last) = ctrl.last() {
            self.port.pen.location = last;
        }
        let mut blit = self.blit_record(DrawAction::Frame, 0);
        self.polyline_global(&mut blit, &pts, false);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
