//! Rectangles, rounded rectangles and ovals.
//!
//! Plain rectangles are drawn with fills (or four lines for a thin frame).
//! Rounded corners are quarter-oval arcs built by [`Edge::top_arc`] and
//! [`Edge::bottom_arc`] and scan converted with the winding rule; an oval
//! is a rounded rectangle whose corner diameters equal its size.
//!
//! Filled shapes start their bottom arcs one scanline late so the middle
//! row is not covered twice. A frame is the ring between an outer and an
//! inner outline, both in one edge table, so each ring pixel is written
//! exactly once.

use crate::basics::{DrawAction, FillRule, Point, Rect};
use crate::context::GrafContext;
use crate::edges::{Edge, EdgeTable};
use crate::error::Result;
use crate::raster::Raster;

// ============================================================================
// Edge builders
// ============================================================================

/// Quadrant radii for `r` with corner diameters `dx`, `dy`, clamped to
/// the rectangle.
#[inline]
fn radii(r: &Rect, dx: i32, dy: i32) -> (i32, i32) {
    (dx.min(r.width()) >> 1, dy.min(r.height()) >> 1)
}

/// Vertical side edges between the arcs. `dir` is the winding of the
/// left side; when the arcs overlap the run is widened to one line and
/// the windings flip.
fn add_sides(table: &mut EdgeTable, r: &Rect, yr: i32, left_x: i32, right_x: i32, mut dir: i32) {
    let mut top = r.ymin + yr + 1;
    let mut bottom = r.ymax - yr;
    if bottom == top {
        return;
    }
    if bottom < top {
        bottom = top;
        top -= 1;
        dir = -dir;
    }
    table.insert(Edge::vertical(left_x, top, bottom - top, dir));
    table.insert(Edge::vertical(right_x, top, bottom - top, -dir));
}

/// Edges covering the interior of a rounded rectangle.
pub(crate) fn fill_table(r: &Rect, dx: i32, dy: i32) -> EdgeTable {
    let (xr, yr) = radii(r, dx, dy);
    let left = r.xmin + xr;
    let right = r.xmax - xr;
    let top = r.ymin + yr;
    let bottom = r.ymax - yr - 1;

    let mut table = EdgeTable::new();
    let first = Edge::top_arc(xr, yr, left, top, -1, -1);
    let flat = first.count == 1;
    table.insert(first);
    table.insert(Edge::top_arc(xr, yr, right, top, 1, 1));
    if !flat {
        for (cx, xdir, winding) in [(left, 1, -1), (right, -1, 1)] {
            let mut e = Edge::bottom_arc(xr, yr, cx, bottom, xdir, winding);
            e.step();
            e.start_y += 1;
            e.count -= 1;
            table.insert(e);
        }
    }
    let side_top = r.ymin + yr + 1;
    let side_bottom = r.ymax - yr;
    if side_bottom > side_top {
        let h = side_bottom - side_top;
        table.insert(Edge::vertical(r.xmin, side_top, h, -1));
        table.insert(Edge::vertical(r.xmax, side_top, h, 1));
    }
    table
}

/// Outer outline of a frame. The right and bottom bounds are inclusive.
fn add_outer(table: &mut EdgeTable, r: &Rect, dx: i32, dy: i32) {
    let (xr, yr) = radii(r, dx, dy);
    let left = r.xmin + xr;
    let right = r.xmax - xr + 1;
    let top = r.ymin + yr;
    let bottom = r.ymax - yr;
    table.insert(Edge::top_arc(xr, yr, left, top, -1, -1));
    table.insert(Edge::top_arc(xr, yr, right, top, 1, 1));
    table.insert(Edge::bottom_arc(xr, yr, left, bottom, 1, -1));
    table.insert(Edge::bottom_arc(xr, yr, right, bottom, -1, 1));
    add_sides(table, r, yr, r.xmin, r.xmax + 1, -1);
}

/// Inner outline of a frame, one pixel inside the outer one and wound
/// the other way.
fn add_inner(table: &mut EdgeTable, r: &Rect, dx: i32, dy: i32) {
    let (xr, yr) = radii(r, dx, dy);
    let left = r.xmin + xr;
    let right = r.xmax - xr + 1;
    let top = r.ymin + yr;
    let bottom = r.ymax - yr;

    let mut tl = Edge::top_arc(xr, yr, left, top, -1, 1);
    tl.x += 1;
    tl.start_y += 1;
    tl.count -= 1;
    if tl.count != 0 {
        table.insert(tl);
        let mut tr = Edge::top_arc(xr, yr, right, top, 1, -1);
        tr.x -= 1;
        tr.start_y += 1;
        tr.count -= 1;
        table.insert(tr);
    }

    let mut bl = Edge::bottom_arc(xr, yr, left, bottom, 1, 1);
    bl.x += 1;
    bl.step();
    bl.count -= 1;
    if bl.count != 0 {
        table.insert(bl);
        let mut br = Edge::bottom_arc(xr, yr, right, bottom, -1, -1);
        br.x -= 1;
        br.step();
        br.count -= 1;
        table.insert(br);
    }
    add_sides(table, r, yr, r.xmin + 1, r.xmax, 1);
}

/// Edges of a rounded frame drawn with a `pen` sized pen. `None` when the
/// rectangle is inverted.
pub(crate) fn frame_table(r: &Rect, dx: i32, dy: i32, pen: Point) -> Option<EdgeTable> {
    if r.width() < 0 || r.height() < 0 {
        return None;
    }
    let mut table = EdgeTable::new();
    if pen.x <= 1 && pen.y <= 1 {
        add_outer(&mut table, r, dx, dy);
        if r.width() > 0 && r.height() > 0 {
            add_inner(&mut table, r, dx, dy);
        }
        return Some(table);
    }

    let (ox, oy) = (pen.x >> 1, pen.y >> 1);
    let outer = Rect::new(r.xmin - ox, r.ymin - oy, r.xmax + ox, r.ymax + oy);
    if outer.width() < 0 || outer.height() < 0 {
        return None;
    }
    add_outer(&mut table, &outer, dx, dy);

    let (ix, iy) = ((pen.x - 1) >> 1, (pen.y - 1) >> 1);
    let inner = Rect::new(r.xmin + ix, r.ymin + iy, r.xmax - ix, r.ymax - iy);
    if inner.width() >= 0 && inner.height() > 0 {
        add_inner(&mut table, &inner, dx, dy);
    }
    Some(table)
}

// ============================================================================
// Drawing
// ============================================================================

impl<R: Raster> GrafContext<R> {
    /// Draw a rectangle given in user space.
    pub fn rect_draw(&mut self, action: DrawAction, r: Rect, pattern: usize) -> Result<()> {
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let frame = action == DrawAction::Frame;
        let g = self.xform.user_to_global_rect(r, frame, &self.errors);
        log::trace!("rect {:?} {:?}", action, g);
        let mut blit = self.blit_record(action, pattern);

        if !frame {
            blit.rects.push(g);
            self.fill_blit(&blit);
            return Ok(());
        }

        let pen = self.port.pen.size;
        if !self.port.pen.is_wide() {
            // Clockwise, each side skipping its last pixel.
            let corners = [
                (Point::new(g.xmin, g.ymin), Point::new(g.xmax, g.ymin)),
                (Point::new(g.xmax, g.ymax), Point::new(g.xmin, g.ymax)),
                (Point::new(g.xmin, g.ymax), Point::new(g.xmin, g.ymin)),
                (Point::new(g.xmax, g.ymin), Point::new(g.xmax, g.ymax)),
            ];
            for (a, b) in corners {
                self.segment_global(&mut blit, a, b, false);
            }
            return Ok(());
        }

        let (hl, hr) = (pen.x >> 1, (pen.x + 1) >> 1);
        let (hu, hd) = (pen.y >> 1, (pen.y + 1) >> 1);
        blit.rects = vec![
            Rect::new(g.xmin - hl, g.ymin - hu, g.xmax + hr, g.ymin + hd),
            Rect::new(g.xmin - hl, g.ymax - hu, g.xmax + hr, g.ymax + hd),
            Rect::new(g.xmin - hl, g.ymin + hd, g.xmin + hr, g.ymax - hu),
            Rect::new(g.xmax - hl, g.ymin + hd, g.xmax + hr, g.ymax - hu),
        ];
        self.fill_blit(&blit);
        Ok(())
    }

    /// Draw a rectangle with rounded corners. `dia_x` and `dia_y` are the
    /// corner oval diameters in user units; both zero draws a plain
    /// rectangle.
    pub fn round_rect_draw(
        &mut self,
        action: DrawAction,
        r: Rect,
        dia_x: i32,
        dia_y: i32,
        pattern: usize,
    ) -> Result<()> {
        if dia_x == 0 && dia_y == 0 {
            return self.rect_draw(action, r, pattern);
        }
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let dia = self
            .xform
            .virtual_to_global_size(dia_x.abs(), dia_y.abs(), &self.errors);
        let g = self.xform.user_to_global_rect(r, false, &self.errors);
        self.rounded_global(action, g, dia.x, dia.y, pattern);
        Ok(())
    }

    /// Draw the oval inscribed in `r`.
    pub fn oval_draw(&mut self, action: DrawAction, r: Rect, pattern: usize) -> Result<()> {
        if !self.port.pen.is_visible() {
            return Ok(());
        }
        let g = self.xform.user_to_global_rect(r, false, &self.errors);
        let (dx, dy) = (g.width().abs(), g.height().abs());
        self.rounded_global(action, g, dx, dy, pattern);
        Ok(())
    }

    pub(crate) fn rounded_global(&mut self, action: DrawAction, g: Rect, dx: i32, dy: i32, pattern: usize) {
        let table = if action == DrawAction::Frame {
            match frame_table(&g, dx, dy, self.port.pen.size) {
                Some(t) => t,
                None => return,
            }
        } else {
            if g.width() <= 0 || g.height() <= 0 {
                return;
            }
            fill_table(&g, dx, dy)
        };
        log::trace!(
            "rounded {:?} {:?} diameters {}x{}: {} edges",
            action,
            g,
            dx,
            dy,
            table.len()
        );
        let mut blit = self.blit_record(action, pattern);
        self.scan_table(table, FillRule::Winding, &mut blit);
    }
}

// ============================================================================
// Tests
// ============================================================================
