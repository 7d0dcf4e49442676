//! Polygon fill and multi-subpath polygon drawing.
//!
//! A polygon is filled by turning each non-horizontal side into an edge,
//! dropping edges entirely above or below the clip, pre-stepping edges
//! that start above it, and scan converting the table with the port's
//! fill rule.

use crate::basics::{CoordMode, DrawAction, FillRule, Point, Rect};
use crate::context::GrafContext;
use crate::edges::{Edge, EdgeTable};
use crate::error::{GrafError, Result};
use crate::raster::{BlitRecord, Raster};
use crate::rect_algebra::intersect_rect;

// ============================================================================
// Edge setup
// ============================================================================

/// Edge for the polygon side `a -> b`, clipped vertically to `clip`.
///
/// Returns `None` for horizontal sides and sides outside the clip band.
/// Sides running down get winding +1, sides running up -1.
pub(crate) fn polygon_edge(a: Point, b: Point, clip: &Rect) -> Option<Edge> {
    if a.y == b.y {
        return None;
    }
    let winding = if a.y < b.y { 1 } else { -1 };
    let mut e = Edge::polygon_line(a.x, a.y, b.x, b.y, winding);
    if e.start_y >= clip.ymax || e.start_y + e.count <= clip.ymin {
        return None;
    }
    if e.start_y < clip.ymin {
        e.skip_lines(clip.ymin - e.start_y);
    }
    e.count = e.count.min(clip.ymax - e.start_y);
    Some(e)
}

/// Bounding box of `pts`, with max bounds inclusive.
fn bounds(pts: &[Point]) -> Rect {
    let mut r = Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
    for p in pts {
        r.xmin = r.xmin.min(p.x);
        r.ymin = r.ymin.min(p.y);
        r.xmax = r.xmax.max(p.x);
        r.ymax = r.ymax.max(p.y);
    }
    r
}

// ============================================================================
// Drawing
// ============================================================================

impl<R: Raster> GrafContext<R> {
    /// Fill a closed polygon given in global coordinates.
    pub(crate) fn fill_global_polygon(&mut self, pts: &[Point], rule: FillRule, blit: &mut BlitRecord) {
        if pts.len() < 3 {
            return;
        }
        let clip = blit.clip;
        let mut table = EdgeTable::new();
        for (i, &a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            if let Some(e) = polygon_edge(a, b, &clip) {
                table.insert(e);
            }
        }
        log::trace!("polygon: {} points, {} edges", pts.len(), table.len());
        self.scan_table(table, rule, blit);
    }

    /// Paint a polygon with the pen. The last point joins the first.
    ///
    /// With [`CoordMode::Previous`] every point after the first is an
    /// offset from the one before it.
    pub fn fill_polygon(&mut self, points: &[Point], mode: CoordMode, rule: FillRule) -> Result<()> {
        if points.len() < 3 {
            return Err(GrafError::TooFewPoints {
                count: points.len(),
            });
        }
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let mut user = points[0];
        let mut global = Vec::with_capacity(points.len());
        for (i, &p) in points.iter().enumerate() {
            if i > 0 {
                user = match mode {
                    CoordMode::Origin => p,
                    CoordMode::Previous => user + p,
                };
            }
            global.push(self.xform.user_to_global_point(user, false, &self.errors));
        }
        let mut blit = self.blit_record(DrawAction::Paint, 0);
        self.fill_global_polygon(&global, rule, &mut blit);
        Ok(())
    }

    /// Draw a polygon made of several subpaths.
    ///
    /// `counts[i]` is the number of points in subpath `i`; subpaths take
    /// consecutive runs of `points`. Frame draws each subpath as a closed
    /// outline. Other actions fill each subpath on its own with the port's
    /// fill rule, skipping subpaths whose bounds miss the clip.
    ///
    /// A count of zero or less stops the whole call with
    /// [`GrafError::EmptySubpath`]; earlier subpaths stay drawn.
    pub fn polygon_draw(
        &mut self,
        action: DrawAction,
        counts: &[i32],
        points: &[Point],
        pattern: usize,
    ) -> Result<()> {
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let mut blit = self.blit_record(action, pattern);
        let mut user_clip = self.global_to_user_rect(blit.clip);
        user_clip.normalize();
        let rule = self.port.fill_rule;
        log::trace!("polygon_draw {:?}: {} subpaths", action, counts.len());

        let mut start = 0usize;
        for (index, &count) in counts.iter().enumerate() {
            if count <= 0 {
                return Err(GrafError::EmptySubpath { index, count });
            }
            let end = start + count as usize;
            if end > points.len() {
                return Err(GrafError::PointCountMismatch {
                    declared: end,
                    available: points.len(),
                });
            }
            let sub = &points[start..end];
            start = end;

            if action == DrawAction::Frame {
                let global: Vec<Point> = sub
                    .iter()
                    .map(|&p| self.xform.user_to_global_point(p, true, &self.errors))
                    .collect();
                self.polyline_global(&mut blit, &global, true);
                continue;
            }
            if intersect_rect(&bounds(sub), &user_clip).is_none() {
                log::trace!("subpath {index} outside clip");
                continue;
            }
            let global: Vec<Point> = sub
                .iter()
                .map(|&p| self.xform.user_to_global_point(p, false, &self.errors))
                .collect();
            self.fill_global_polygon(&global, rule, &mut blit);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
