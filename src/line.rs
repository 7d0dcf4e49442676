//! Lines and polylines.
//!
//! Thin lines are integer Bresenham lines written pixel by pixel through
//! [`Raster::set_pixel`]. Segments joined into a polyline skip their last
//! pixel so shared vertices are drawn once, which keeps XOR and invert
//! pens from cancelling at the joints. Wide lines sweep the square pen
//! along the segment and fill the resulting hull.

use crate::basics::{DrawAction, FillRule, Point, COORD_LIMIT};
use crate::context::GrafContext;
use crate::error::{GrafError, Result};
use crate::raster::{BlitRecord, Raster};

// ============================================================================
// Bresenham iterator
// ============================================================================

/// Pixels of an 8-connected line from `p0` toward `p1`.
///
/// With `last` false the end point is not produced; a zero-length line
/// then produces nothing.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    end: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    last: bool,
    done: bool,
}

impl BresenhamLine {
    pub fn new(p0: Point, p1: Point, last: bool) -> Self {
        let dx = (p1.x - p0.x).abs();
        let dy = -(p1.y - p0.y).abs();
        Self {
            x: p0.x,
            y: p0.y,
            end: p1,
            dx,
            dy,
            sx: if p0.x < p1.x { 1 } else { -1 },
            sy: if p0.y < p1.y { 1 } else { -1 },
            err: dx + dy,
            last,
            done: false,
        }
    }

    /// Number of pixels the line covers including both ends.
    pub fn span(p0: Point, p1: Point) -> i32 {
        (p1.x - p0.x).abs().max((p1.y - p0.y).abs()) + 1
    }
}

impl Iterator for BresenhamLine {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let pt = Point::new(self.x, self.y);
        if pt == self.end {
            self.done = true;
            return if self.last { Some(pt) } else { None };
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(pt)
    }
}

// ============================================================================
// Square pen hull
// ============================================================================

/// Outline swept by a `size` pen moving from `a` to `b`, as a convex
/// polygon in pixel-corner coordinates.
///
/// The pen hangs `size / 2` (rounded down) left of and above the point
/// it is centred on.
pub(crate) fn pen_hull(a: Point, b: Point, size: Point) -> Vec<Point> {
    let (hl, hr) = (size.x >> 1, (size.x + 1) >> 1);
    let (hu, hd) = (size.y >> 1, (size.y + 1) >> 1);
    let mut corners = Vec::with_capacity(8);
    for p in [a, b] {
        corners.push(Point::new(p.x - hl, p.y - hu));
        corners.push(Point::new(p.x + hr, p.y - hu));
        corners.push(Point::new(p.x + hr, p.y + hd));
        corners.push(Point::new(p.x - hl, p.y + hd));
    }
    convex_hull(corners)
}

/// Monotone chain hull, counter-clockwise in Y-down space, no collinear
/// points.
fn convex_hull(mut pts: Vec<Point>) -> Vec<Point> {
    pts.sort_by_key(|p| (p.x, p.y));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let cross = |o: Point, a: Point, b: Point| -> i64 {
        (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
    };
    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() + 1);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

// ============================================================================
// Drawing
// ============================================================================

impl<R: Raster> GrafContext<R> {
    /// Draw one global segment with the pen in `blit`. Segments spanning
    /// more than the coordinate range are dropped with `OversizedRect`.
    pub(crate) fn segment_global(&mut self, blit: &mut BlitRecord, a: Point, b: Point, last: bool) {
        let limit = COORD_LIMIT as i64;
        if (b.x as i64 - a.x as i64).abs() > limit || (b.y as i64 - a.y as i64).abs() > limit {
            self.errors.post(GrafError::OversizedRect);
            return;
        }
        if self.port.pen.is_wide() {
            let hull = pen_hull(a, b, self.port.pen.size);
            self.fill_global_polygon(&hull, FillRule::Winding, blit);
        } else {
            for p in BresenhamLine::new(a, b, last) {
                self.raster.set_pixel(blit, p);
            }
        }
    }

    /// Draw a connected run of global points. Thin joints are drawn once;
    /// the final point is drawn unless `closed`, which also joins the last
    /// point back to the first.
    pub(crate) fn polyline_global(&mut self, blit: &mut BlitRecord, pts: &[Point], closed: bool) {
        match pts {
            [] => {}
            [p] => self.segment_global(blit, *p, *p, true),
            _ => {
                let n = pts.len();
                for w in pts.windows(2) {
                    self.segment_global(blit, w[0], w[1], false);
                }
                if closed {
                    if pts[n - 1] != pts[0] {
                        self.segment_global(blit, pts[n - 1], pts[0], false);
                    }
                } else if !self.port.pen.is_wide() {
                    self.segment_global(blit, pts[n - 1], pts[n - 1], true);
                }
            }
        }
    }

    /// Draw from the pen location to `pt` (user space), including both
    /// ends, and move the pen there.
    pub fn line_to(&mut self, pt: Point) {
        let from = self.global_pen_location();
        self.port.pen.location = pt;
        if !self.port.pen.is_visible() {
            return;
        }
        let to = self.global_pen_location();
        log::trace!("line_to {:?} -> {:?}", from, to);
        let mut blit = self.blit_record(DrawAction::Frame, 0);
        self.segment_global(&mut blit, from, to, true);
    }

    /// Draw a line between two user-space points.
    pub fn line(&mut self, p0: Point, p1: Point) {
        self.move_to(p0);
        self.line_to(p1);
    }

    /// Draw a polyline through user-space `points`. With `closed` the last
    /// point is joined back to the first.
    pub fn polyline(&mut self, points: &[Point], closed: bool) -> Result<()> {
        if points.is_empty() {
            return Err(GrafError::TooFewPoints { count: 0 });
        }
        if let Some(&last) = points.last() {
            self.port.pen.location = last;
        }
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let global: Vec<Point> = points
            .iter()
            .map(|&p| self.xform.user_to_global_point(p, true, &self.errors))
            .collect();
        log::trace!("polyline {} points closed={}", global.len(), closed);
        let mut blit = self.blit_record(DrawAction::Frame, 0);
        self.polyline_global(&mut blit, &global, closed);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
