//! Edge-list scan conversion.
//!
//! Shapes are described as a set of monotone edges, each covering a run of
//! scanlines and knowing how to advance its X by one scanline. Edges are
//! kept Y/X sorted in a global edge table (GET); [`EdgeTable::scan`] walks
//! scanlines from the top, moving edges into an active edge table (AET)
//! as they start, and turns each scanline's crossings into spans.
//!
//! Spans cover pixels on or to the right of a left crossing and strictly
//! left of a right crossing, so adjacent shapes sharing an edge never
//! overlap. Identical consecutive scanlines are merged into taller rects
//! before they are handed to the fill callback in bursts.

use crate::basics::{FillRule, Rect};

// ============================================================================
// Steppers
// ============================================================================

/// Bresenham state for a straight edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineStep {
    whole: i32,
    adj_up: i64,
    adj_down: i64,
    err: i64,
    xdir: i32,
}

/// Midpoint oval state for one quadrant.
///
/// The error term carries quarter units, so it is stored scaled by four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArcStep {
    a_sq_x2: i64,
    b_sq_x2: i64,
    x_adj: i64,
    y_adj: i64,
    err4: i64,
    final_x: i32,
    xdir: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stepper {
    Line(LineStep),
    Vertical,
    TopArc(ArcStep),
    BottomArc(ArcStep),
}

// ============================================================================
// Edge
// ============================================================================

/// One monotone edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// X crossing on the current scanline.
    pub x: i32,
    /// First scanline covered.
    pub start_y: i32,
    /// Scanlines left to cover.
    pub count: i32,
    /// +1 for an edge running down the shape's outline, -1 for up.
    pub winding: i32,
    stepper: Stepper,
}

impl Edge {
    /// Straight edge between two points, oriented top to bottom.
    ///
    /// A horizontal edge gets a count of zero and never becomes active.
    pub fn line(x0: i32, y0: i32, x1: i32, y1: i32, winding: i32) -> Self {
        Self::line_setup(x0, y0, x1, y1, winding, false)
    }

    /// Like [`line`](Self::line), but a 45 degree edge steps as Y-major.
    /// Polygon edges use this; on leftward diagonals it keeps X one pixel
    /// to the right of the line form.
    pub fn polygon_line(x0: i32, y0: i32, x1: i32, y1: i32, winding: i32) -> Self {
        Self::line_setup(x0, y0, x1, y1, winding, true)
    }

    fn line_setup(x0: i32, y0: i32, x1: i32, y1: i32, winding: i32, tie_y_major: bool) -> Self {
        let (sx, sy, ex, ey) = if y0 < y1 {
            (x0, y0, x1, y1)
        } else {
            (x1, y1, x0, y0)
        };
        let dy = (ey - sy) as i64;
        let mut dx = (ex - sx) as i64;
        let (xdir, err) = if dx < 0 {
            dx = -dx;
            (-1, -dy)
        } else {
            (1, -1)
        };
        let y_major = if tie_y_major { dy >= dx } else { dy > dx };
        let (whole, adj_up) = if y_major || dy == 0 {
            (0, dx)
        } else {
            ((dx / dy) as i32 * xdir, dx % dy)
        };
        Self {
            x: sx,
            start_y: sy,
            count: dy as i32,
            winding,
            stepper: Stepper::Line(LineStep {
                whole,
                adj_up,
                adj_down: dy,
                err,
                xdir,
            }),
        }
    }

    /// Constant-X edge covering `height` scanlines from `y`.
    pub fn vertical(x: i32, y: i32, height: i32, winding: i32) -> Self {
        Self {
            x,
            start_y: y,
            count: height,
            winding,
            stepper: Stepper::Vertical,
        }
    }

    /// Upper quadrant of an oval with radii `a`, `b` centred on
    /// `(cx, cy)`. Runs from the top of the oval (X = `cx`) down to the
    /// horizontal axis (X = `cx + xdir * a`), covering `b + 1` scanlines.
    pub fn top_arc(a: i32, b: i32, cx: i32, cy: i32, xdir: i32, winding: i32) -> Self {
        let final_x = if xdir < 0 { cx - a } else { cx + a };
        let mut edge = Self::vertical(cx, cy - b, b + 1, winding);
        if b == 0 {
            edge.x = final_x;
            return edge;
        }
        if a == 0 {
            return edge;
        }
        let (a_sq, b_sq) = (a as i64 * a as i64, b as i64 * b as i64);
        let mut arc = ArcStep {
            a_sq_x2: 2 * a_sq,
            b_sq_x2: 2 * b_sq,
            x_adj: 0,
            y_adj: 2 * a_sq * b as i64,
            err4: 0,
            final_x,
            xdir,
        };
        arc.err4 = (a_sq + b_sq) - 2 * arc.y_adj;
        // Pre-compensate for the first step below.
        arc.err4 += 4 * arc.y_adj;
        arc.y_adj += arc.a_sq_x2;
        edge.stepper = Stepper::TopArc(arc);
        edge.step();
        edge
    }

    /// Lower quadrant of an oval. Starts on the horizontal axis at
    /// `cx - xdir * a` and runs `b + 1` scanlines down toward X = `cx`.
    pub fn bottom_arc(a: i32, b: i32, cx: i32, cy: i32, xdir: i32, winding: i32) -> Self {
        let x = if xdir < 0 { cx + a } else { cx - a };
        let mut edge = Self::vertical(x, cy, b + 1, winding);
        if a == 0 {
            return edge;
        }
        let (a_sq, b_sq) = (a as i64 * a as i64, b as i64 * b as i64);
        let x_adj = 2 * b_sq * a as i64;
        edge.stepper = Stepper::BottomArc(ArcStep {
            a_sq_x2: 2 * a_sq,
            b_sq_x2: 2 * b_sq,
            x_adj,
            y_adj: 0,
            err4: (a_sq + b_sq) - 2 * x_adj,
            final_x: x,
            xdir,
        });
        edge
    }

    /// Advance X to the next scanline. Returns `true` if X may differ from
    /// the previous scanline.
    pub fn step(&mut self) -> bool {
        match &mut self.stepper {
            Stepper::Vertical => false,
            Stepper::Line(s) => {
                let mut changed = false;
                if s.whole != 0 {
                    changed = true;
                    self.x += s.whole;
                }
                s.err += s.adj_up;
                if s.err > 0 {
                    changed = true;
                    self.x += s.xdir;
                    s.err -= s.adj_down;
                }
                changed
            }
            Stepper::TopArc(s) => {
                let step_y = s.y_adj - s.a_sq_x2;
                if step_y == 0 {
                    // Bottom of the arc: land exactly on the axis.
                    self.x = s.final_x;
                    return true;
                }
                s.y_adj = step_y;
                s.err4 -= 4 * step_y;
                if s.err4 >= 0 {
                    return false;
                }
                while s.err4 < 0 {
                    self.x += s.xdir;
                    s.x_adj += s.b_sq_x2;
                    s.err4 += 4 * s.x_adj;
                }
                true
            }
            Stepper::BottomArc(s) => {
                let step_y = s.y_adj;
                s.y_adj += s.a_sq_x2;
                s.err4 += 4 * step_y;
                if s.err4 < 0 || s.x_adj == 0 {
                    return false;
                }
                loop {
                    self.x += s.xdir;
                    s.x_adj -= s.b_sq_x2;
                    if s.x_adj == 0 {
                        break;
                    }
                    s.err4 -= 4 * s.x_adj;
                    if s.err4 < 0 {
                        break;
                    }
                }
                true
            }
        }
    }

    /// Skip the first `lines` scanlines of a straight edge in one go.
    ///
    /// Leaves the edge exactly where `lines` calls to [`step`](Self::step)
    /// would. Other edge kinds are stepped one line at a time.
    pub fn skip_lines(&mut self, lines: i32) {
        if lines <= 0 {
            return;
        }
        self.start_y += lines;
        self.count -= lines;
        match &mut self.stepper {
            Stepper::Line(s) => {
                let e = s.err + lines as i64 * s.adj_up;
                if e > 0 {
                    let k = (e - 1) / s.adj_down + 1;
                    self.x += (k as i32) * s.xdir;
                    s.err = e - k * s.adj_down;
                } else {
                    s.err = e;
                }
                self.x += lines * s.whole;
            }
            _ => {
                for _ in 0..lines {
                    self.step();
                }
            }
        }
    }
}

// ============================================================================
// EdgeTable
// ============================================================================

/// Global edge table, sorted by start Y then X.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping Y/X order. Among equal keys the newest goes first.
    pub fn insert(&mut self, edge: Edge) {
        let at = self
            .edges
            .iter()
            .position(|e| e.start_y > edge.start_y || (e.start_y == edge.start_y && e.x >= edge.x))
            .unwrap_or(self.edges.len());
        self.edges.insert(at, edge);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Scan-convert the table.
    ///
    /// `emit` receives up to `burst` rectangles at a time (at least one).
    pub fn scan<F>(self, rule: FillRule, burst: usize, mut emit: F)
    where
        F: FnMut(&[Rect]),
    {
        let burst = burst.max(1);
        let mut pending = self.edges.into_iter().peekable();
        let Some(first) = pending.peek() else {
            return;
        };
        let mut y = first.start_y;
        let mut aet: Vec<Edge> = Vec::new();
        let mut rects: Vec<Rect> = Vec::with_capacity(burst);
        let mut last_scan = 0usize;
        let mut same_as_last = false;

        loop {
            // Move edges starting on this line into the AET, X sorted.
            let mut pos = 0;
            while let Some(edge) = pending.next_if(|e| e.start_y == y) {
                same_as_last = false;
                while pos < aet.len() && aet[pos].x < edge.x {
                    pos += 1;
                }
                aet.insert(pos, edge);
                pos += 1;
            }

            if !aet.is_empty() {
                if same_as_last {
                    for r in &mut rects[last_scan..] {
                        r.ymax = y + 1;
                    }
                } else {
                    same_as_last = true;
                    last_scan = rects.len();
                    let mut push = |r: Rect, rects: &mut Vec<Rect>| {
                        rects.push(r);
                        if rects.len() >= burst {
                            emit(rects);
                            rects.clear();
                            true
                        } else {
                            false
                        }
                    };
                    let mut flushed = false;
                    match rule {
                        FillRule::OddEven => {
                            for pair in aet.chunks_exact(2) {
                                let r = Rect::new(pair[0].x, y, pair[1].x, y + 1);
                                flushed |= push(r, &mut rects);
                            }
                        }
                        FillRule::Winding => {
                            let mut i = 0;
                            while i < aet.len() {
                                let start = aet[i].x;
                                let mut sum = aet[i].winding;
                                let mut j = i + 1;
                                while j < aet.len() {
                                    sum += aet[j].winding;
                                    if sum == 0 {
                                        break;
                                    }
                                    j += 1;
                                }
                                if j < aet.len() {
                                    let r = Rect::new(start, y, aet[j].x, y + 1);
                                    flushed |= push(r, &mut rects);
                                }
                                i = j + 1;
                            }
                        }
                    }
                    if flushed {
                        // This line's rects are gone, so nothing to extend.
                        same_as_last = false;
                        last_scan = rects.len();
                    }
                }

                aet.retain_mut(|e| {
                    e.count -= 1;
                    if e.count <= 0 {
                        same_as_last = false;
                        false
                    } else {
                        if e.step() {
                            same_as_last = false;
                        }
                        true
                    }
                });
                // Stable, so edges at equal X keep their order.
                aet.sort_by_key(|e| e.x);
            }

            y += 1;
            if pending.peek().is_none() && aet.is_empty() {
                break;
            }
        }

        if !rects.is_empty() {
            emit(&rects);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(table: EdgeTable, rule: FillRule, burst: usize) -> Vec<Vec<Rect>> {
        let mut out = Vec::new();
        table.scan(rule, burst, |rs| out.push(rs.to_vec()));
        out
    }

    fn square(x0: i32, y0: i32, x1: i32, y1: i32) -> EdgeTable {
        let mut t = EdgeTable::new();
        t.insert(Edge::line(x0, y0, x0, y1, -1));
        t.insert(Edge::line(x1, y0, x1, y1, 1));
        t
    }

    #[test]
    fn test_line_setup_orients_down() {
        let e = Edge::line(10, 8, 2, 0, 1);
        assert_eq!(e.x, 2);
        assert_eq!(e.start_y, 0);
        assert_eq!(e.count, 8);
    }

    #[test]
    fn test_line_steps_match_bresenham() {
        // 45 degrees: one pixel per scanline.
        let mut e = Edge::line(0, 0, 4, 4, 1);
        let xs: Vec<i32> = (0..4)
            .map(|_| {
                e.step();
                e.x
            })
            .collect();
        assert_eq!(xs, vec![1, 2, 3, 4]);

        // X-major to the left: whole steps of -3.
        let mut e = Edge::line(9, 0, 0, 3, 1);
        e.step();
        assert_eq!(e.x, 6);
    }

    #[test]
    fn test_polygon_line_lags_on_left_diagonal() {
        let mut a = Edge::line(8, 0, 0, 8, 1);
        let mut b = Edge::polygon_line(8, 0, 0, 8, 1);
        a.step();
        b.step();
        assert_eq!((a.x, b.x), (7, 8));
        a.step();
        b.step();
        assert_eq!((a.x, b.x), (6, 7));

        // Rightward diagonals agree.
        let mut a = Edge::line(0, 0, 8, 8, 1);
        let mut b = Edge::polygon_line(0, 0, 8, 8, 1);
        for _ in 0..5 {
            a.step();
            b.step();
            assert_eq!(a.x, b.x);
        }
    }

    #[test]
    fn test_vertical_never_changes() {
        let mut e = Edge::vertical(5, 0, 10, 1);
        assert!(!e.step());
        assert_eq!(e.x, 5);
    }

    #[test]
    fn test_skip_lines_matches_stepping() {
        for &(x0, y0, x1, y1) in &[
            (0, 0, 3, 17),
            (20, 0, 1, 9),
            (0, 0, 40, 7),
            (5, 2, 5, 30),
            (0, 0, 13, 13),
            (30, -5, 0, 25),
        ] {
            for skip in 0..6 {
                let mut stepped = Edge::line(x0, y0, x1, y1, 1);
                for _ in 0..skip {
                    stepped.step();
                }
                let mut skipped = Edge::line(x0, y0, x1, y1, 1);
                skipped.skip_lines(skip);
                assert_eq!(skipped.x, stepped.x, "{:?} skip {}", (x0, y0, x1, y1), skip);
                // Subsequent stepping stays in lockstep too.
                stepped.step();
                skipped.step();
                assert_eq!(skipped.x, stepped.x);
                assert_eq!(skipped.start_y, y0.min(y1) + skip);
            }
        }
    }

    #[test]
    fn test_top_arc_reaches_axis() {
        let mut e = Edge::top_arc(4, 3, 10, 10, 1, 1);
        assert_eq!(e.start_y, 7);
        assert_eq!(e.count, 4);
        for _ in 0..3 {
            e.step();
        }
        assert_eq!(e.x, 14);
    }

    #[test]
    fn test_flat_top_arc_starts_at_final_x() {
        let e = Edge::top_arc(6, 0, 10, 10, -1, 1);
        assert_eq!(e.x, 4);
        assert_eq!(e.count, 1);
    }

    #[test]
    fn test_insert_orders_by_y_then_x() {
        let mut t = EdgeTable::new();
        t.insert(Edge::vertical(5, 2, 1, 1));
        t.insert(Edge::vertical(1, 3, 1, 1));
        t.insert(Edge::vertical(3, 2, 1, 1));
        t.insert(Edge::vertical(9, 0, 1, 1));
        let keys: Vec<(i32, i32)> = t.edges().iter().map(|e| (e.start_y, e.x)).collect();
        assert_eq!(keys, vec![(0, 9), (2, 3), (2, 5), (3, 1)]);
    }

    #[test]
    fn test_scan_square_merges_rows() {
        let out = collect(square(2, 1, 6, 5), FillRule::OddEven, 64);
        assert_eq!(out, vec![vec![Rect::new(2, 1, 6, 5)]]);
    }

    #[test]
    fn test_scan_empty_table() {
        assert!(collect(EdgeTable::new(), FillRule::Winding, 8).is_empty());
    }

    #[test]
    fn test_scan_triangle_rows() {
        let mut t = EdgeTable::new();
        t.insert(Edge::line(0, 0, 0, 4, -1));
        t.insert(Edge::line(4, 4, 0, 0, 1));
        let out = collect(t, FillRule::OddEven, 64);
        let rows: Vec<(i32, i32)> = out[0].iter().map(|r| (r.xmin, r.xmax)).collect();
        assert_eq!(rows, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_winding_vs_odd_even_nested() {
        // Two nested squares running the same way.
        let build = || {
            let mut t = square(0, 0, 10, 2);
            t.insert(Edge::line(3, 0, 3, 2, -1));
            t.insert(Edge::line(7, 0, 7, 2, 1));
            t
        };
        let odd = collect(build(), FillRule::OddEven, 64);
        assert_eq!(odd, vec![vec![Rect::new(0, 0, 3, 2), Rect::new(7, 0, 10, 2)]]);
        let wind = collect(build(), FillRule::Winding, 64);
        assert_eq!(wind, vec![vec![Rect::new(0, 0, 10, 2)]]);
    }

    #[test]
    fn test_burst_flush_breaks_merging() {
        let mut t = square(0, 0, 2, 3);
        t.insert(Edge::line(4, 0, 4, 3, -1));
        t.insert(Edge::line(6, 0, 6, 3, 1));
        let out = collect(t, FillRule::OddEven, 2);
        // Each full line fills the burst, so rows cannot be merged.
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], vec![Rect::new(0, 0, 2, 1), Rect::new(4, 0, 6, 1)]);
        assert_eq!(out[2], vec![Rect::new(0, 2, 2, 3), Rect::new(4, 2, 6, 3)]);
    }

    #[test]
    fn test_oval_quadrants_fill_8x6() {
        // Fill-style oval in (0,0)-(8,6): radii 4 and 3.
        let mut t = EdgeTable::new();
        let e0 = Edge::top_arc(4, 3, 4, 3, -1, -1);
        let single = e0.count == 1;
        t.insert(e0);
        t.insert(Edge::top_arc(4, 3, 4, 3, 1, 1));
        assert!(!single);
        for &(xdir, w) in &[(1, -1), (-1, 1)] {
            let mut e = Edge::bottom_arc(4, 3, 4, 2, xdir, w);
            e.step();
            e.start_y += 1;
            e.count -= 1;
            t.insert(e);
        }
        let out = collect(t, FillRule::Winding, 64);
        assert_eq!(
            out,
            vec![vec![
                Rect::new(2, 0, 6, 1),
                Rect::new(1, 1, 7, 2),
                Rect::new(0, 2, 8, 3),
                Rect::new(0, 3, 8, 4),
                Rect::new(1, 4, 7, 5),
                Rect::new(2, 5, 6, 6),
            ]]
        );
    }
}
