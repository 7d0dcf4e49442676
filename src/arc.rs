//! Elliptical arcs and wedges.
//!
//! Angles are tenths of a degree, counterclockwise from three o'clock, so
//! `0..1800` is the top half of an oval. A filled arc is the wedge of the
//! oval between the start and end angles; a framed arc is the same slice of
//! the oval's ring.
//!
//! The whole oval (or ring) is scan converted from its usual edge table and
//! each span is then cut against a wedge polygon fanned out from the centre
//! through the two boundary points. The curved outline of an arc is
//! therefore pixel for pixel the outline of the oval it belongs to, and two
//! arcs that split a turn between them cover the oval exactly once.

use crate::basics::{DrawAction, FillRule, Point, Rect};
use crate::context::GrafContext;
use crate::edges::EdgeTable;
use crate::error::{GrafError, Result};
use crate::math::{
    fix_mul, fixed_floor, icos, isin, normalize_angle, to_fixed, Fixed, FIXED_ONE, FULL_TURN,
};
use crate::polygon::polygon_edge;
use crate::raster::Raster;
use crate::rect_draw::{fill_table, frame_table};

/// Wedge polygon vertices are at most a quarter turn apart.
const QUARTER_TURN: i32 = 900;

/// Wedge vertices are kept inside this range.
const WEDGE_LIMIT: i64 = 1 << 24;

// ============================================================================
// Wedge geometry
// ============================================================================

#[inline]
fn round_fixed(v: Fixed) -> i32 {
    fixed_floor(v.saturating_add(FIXED_ONE / 2))
}

/// Offset from the centre of the oval point at `angle`, Y pointing down.
pub(crate) fn oval_offset(xr: i32, yr: i32, angle: i32) -> Point {
    let dx = round_fixed(fix_mul(to_fixed(xr), icos(angle)));
    let dy = round_fixed(fix_mul(to_fixed(yr), isin(angle)));
    Point::new(dx, -dy)
}

/// How far past the oval the wedge vertices sit, as a multiple of the
/// oval offset. Chords between vertices a quarter turn apart must still
/// clear the outline grown by `reach` pixels.
fn wedge_scale(min_radius: i32, reach: i32) -> i64 {
    let m = min_radius.max(1) as i64;
    (2 * (m + reach as i64 + 1) + m - 1) / m
}

/// Closed wedge polygon: the centre, then vertices every quarter turn from
/// `start` up to `start + sweep`.
fn wedge_points(
    centre: Point,
    xr: i32,
    yr: i32,
    start: i32,
    sweep: i32,
    reach: i32,
) -> Vec<Point> {
    let scale = wedge_scale(xr.min(yr), reach);
    let far = |c: i32, d: i32| {
        (c as i64 + d as i64 * scale).clamp(-WEDGE_LIMIT, WEDGE_LIMIT) as i32
    };
    let vertex = |angle: i32| {
        let off = oval_offset(xr, yr, angle);
        Point::new(far(centre.x, off.x), far(centre.y, off.y))
    };

    let end = start + sweep;
    let mut pts = vec![centre];
    let mut angle = start;
    while angle < end {
        pts.push(vertex(angle));
        angle += QUARTER_TURN;
    }
    pts.push(vertex(end));
    pts
}

/// Wedge spans indexed by scanline.
struct WedgeRows {
    top: i32,
    rows: Vec<Vec<(i32, i32)>>,
}

impl WedgeRows {
    fn new(rects: &[Rect]) -> Self {
        let top = rects.iter().map(|r| r.ymin).min().unwrap_or(0);
        let bottom = rects.iter().map(|r| r.ymax).max().unwrap_or(top);
        let mut rows = vec![Vec::new(); (bottom - top).max(0) as usize];
        for r in rects {
            for y in r.ymin..r.ymax {
                if let Some(row) = rows.get_mut((y - top) as usize) {
                    row.push((r.xmin, r.xmax));
                }
            }
        }
        Self { top, rows }
    }

    fn row(&self, y: i32) -> &[(i32, i32)] {
        usize::try_from(y - self.top)
            .ok()
            .and_then(|i| self.rows.get(i))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Append the parts of `span` inside the wedge, one rect per scanline.
    fn cut(&self, span: &Rect, out: &mut Vec<Rect>) {
        for y in span.ymin..span.ymax {
            for &(x0, x1) in self.row(y) {
                let (lo, hi) = (x0.max(span.xmin), x1.min(span.xmax));
                if lo < hi {
                    out.push(Rect::new(lo, y, hi, y + 1));
                }
            }
        }
    }
}

// ============================================================================
// Drawing
// ============================================================================

impl<R: Raster> GrafContext<R> {
    /// Draw the arc of the oval inscribed in `r` from `start_angle` through
    /// `arc_angle`, both in tenths of a degree.
    ///
    /// A negative `arc_angle` sweeps clockwise. A sweep of a full turn or
    /// more draws the whole oval. `Frame` outlines the curved part only;
    /// the other actions fill the wedge. Ovals less than two pixels across
    /// have no arcs.
    pub fn arc_draw(
        &mut self,
        action: DrawAction,
        r: Rect,
        start_angle: i32,
        arc_angle: i32,
        pattern: usize,
    ) -> Result<()> {
        if arc_angle == 0 {
            return Err(GrafError::EmptyArc);
        }
        if !self.port.pen.is_visible() {
            return Ok(());
        }

        let mut sweep = arc_angle.clamp(-FULL_TURN, FULL_TURN);
        let mut start = normalize_angle(start_angle);
        if sweep < 0 {
            start = normalize_angle(start + sweep);
            sweep = -sweep;
        }

        let g = self.xform.user_to_global_rect(r, false, &self.errors);
        let (dx, dy) = (g.width().abs(), g.height().abs());
        if sweep >= FULL_TURN {
            self.rounded_global(action, g, dx, dy, pattern);
            return Ok(());
        }

        let (xr, yr) = (g.width() >> 1, g.height() >> 1);
        if xr <= 0 || yr <= 0 {
            return Ok(());
        }

        let pen = self.port.pen.size;
        let (shape, reach) = if action == DrawAction::Frame {
            match frame_table(&g, dx, dy, pen) {
                Some(t) => (t, pen.x.max(pen.y)),
                None => return Ok(()),
            }
        } else {
            (fill_table(&g, dx, dy), 0)
        };

        let centre = Point::new(g.xmin + xr, g.ymin + yr);
        let pts = wedge_points(centre, xr, yr, start, sweep, reach);
        log::trace!(
            "arc {:?} {:?} from {} sweep {}: {} wedge points",
            action,
            g,
            start,
            sweep,
            pts.len()
        );

        let clip = self.global_clip();
        let mut wedge = EdgeTable::new();
        for (i, &a) in pts.iter().enumerate() {
            if let Some(e) = polygon_edge(a, pts[(i + 1) % pts.len()], &clip) {
                wedge.insert(e);
            }
        }
        let burst = self.config.fill_burst_rects;
        let mut wedge_rects = Vec::new();
        wedge.scan(FillRule::Winding, burst, |rects| wedge_rects.extend_from_slice(rects));
        let rows = WedgeRows::new(&wedge_rects);

        let mut cut = Vec::new();
        shape.scan(FillRule::Winding, burst, |spans| {
            for span in spans {
                rows.cut(span, &mut cut);
            }
        });

        let mut blit = self.blit_record(action, pattern);
        for chunk in cut.chunks(burst.max(1)) {
            blit.rects.clear();
            blit.rects.extend_from_slice(chunk);
            self.fill_blit(&blit);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
