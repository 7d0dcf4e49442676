//! Rectangle set algebra.
//!
//! Construction, comparison, inset/offset, intersection, union and the
//! shift operation that reports the region a moved rectangle leaves
//! uncovered. All functions are total: degenerate rectangles are ordinary
//! values.

use crate::basics::{Point, Rect};

// ============================================================================
// Construction and predicates
// ============================================================================

/// Rectangle from two corners, normalized so min <= max on both axes.
pub fn set_rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Rect {
    let mut r = Rect::new(x1, y1, x2, y2);
    r.normalize();
    r
}

/// Rectangle from an origin and a size. Negative sizes are normalized.
pub fn init_rect(origin: Point, width: i32, height: i32) -> Rect {
    set_rect(origin.x, origin.y, origin.x + width, origin.y + height)
}

#[inline]
pub fn equal_rect(a: &Rect, b: &Rect) -> bool {
    a == b
}

/// True when the rectangle covers no pixels.
#[inline]
pub fn empty_rect(r: &Rect) -> bool {
    r.xmax <= r.xmin || r.ymax <= r.ymin
}

/// True when `pt` lies inside the half-open rectangle.
#[inline]
pub fn pt_in_rect(pt: Point, r: &Rect) -> bool {
    pt.x >= r.xmin && pt.x < r.xmax && pt.y >= r.ymin && pt.y < r.ymax
}

// ============================================================================
// Inset / offset
// ============================================================================

/// Shrink by `dx` on the left and right and `dy` on the top and bottom.
/// Negative values grow the rectangle.
pub fn inset_rect(r: &mut Rect, dx: i32, dy: i32) {
    r.xmin += dx;
    r.xmax -= dx;
    r.ymin += dy;
    r.ymax -= dy;
}

pub fn offset_rect(r: &mut Rect, dx: i32, dy: i32) {
    r.xmin += dx;
    r.xmax += dx;
    r.ymin += dy;
    r.ymax += dy;
}

// ============================================================================
// Intersection / union
// ============================================================================

/// One-axis overlap, trusting `a` as the outer span.
///
/// Succeeds when `a_min <= b_min <= a_max`; touching spans yield a
/// zero-length overlap.
#[inline]
fn axis_overlap(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> Option<(i32, i32)> {
    if a_min <= b_min && b_min <= a_max {
        Some((b_min, a_max.min(b_max)))
    } else {
        None
    }
}

/// Intersection of two rectangles.
///
/// Returns `None` when they are disjoint. Rectangles that only share an
/// edge intersect in a zero-width (or zero-height) rectangle. The result
/// does not depend on argument order.
pub fn intersect_rect(a: &Rect, b: &Rect) -> Option<Rect> {
    let (xmin, xmax) = axis_overlap(a.xmin, a.xmax, b.xmin, b.xmax)
        .or_else(|| axis_overlap(b.xmin, b.xmax, a.xmin, a.xmax))?;
    let (ymin, ymax) = axis_overlap(a.ymin, a.ymax, b.ymin, b.ymax)
        .or_else(|| axis_overlap(b.ymin, b.ymax, a.ymin, a.ymax))?;
    Some(Rect::new(xmin, ymin, xmax, ymax))
}

/// Bounding rectangle of both inputs.
pub fn union_rect(a: &Rect, b: &Rect) -> Rect {
    Rect::new(
        a.xmin.min(b.xmin),
        a.ymin.min(b.ymin),
        a.xmax.max(b.xmax),
        a.ymax.max(b.ymax),
    )
}

// ============================================================================
// Shift
// ============================================================================

/// Up to two rectangles uncovered by a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftVoids {
    count: usize,
    rects: [Rect; 2],
}

impl ShiftVoids {
    fn none() -> Self {
        Self::default()
    }

    fn one(r: Rect) -> Self {
        Self {
            count: 1,
            rects: [r, Rect::default()],
        }
    }

    fn two(a: Rect, b: Rect) -> Self {
        Self {
            count: 2,
            rects: [a, b],
        }
    }

    /// Number of void rectangles: 0, 1 or 2.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.rects[..self.count]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.as_slice().iter()
    }
}

/// Move `r` by `(dx, dy)` in place and return the part of the original
/// rectangle the moved one no longer covers.
///
/// If the move is at least the full width or height the whole original
/// rectangle is void. Otherwise a pure horizontal or vertical move leaves
/// one strip, and a diagonal move leaves a full-width band plus a side
/// strip over the remaining rows; the two never overlap.
pub fn shift_rect(r: &mut Rect, dx: i32, dy: i32) -> ShiftVoids {
    let old = *r;
    offset_rect(r, dx, dy);

    if dx == 0 && dy == 0 {
        return ShiftVoids::none();
    }
    if dx.abs() >= old.width() || dy.abs() >= old.height() {
        return ShiftVoids::one(old);
    }

    // Columns left behind by the horizontal component, over rows [y0, y1).
    let side = |y0: i32, y1: i32| {
        if dx > 0 {
            Rect::new(old.xmin, y0, old.xmin + dx, y1)
        } else {
            Rect::new(old.xmax + dx, y0, old.xmax, y1)
        }
    };

    match (dx.signum(), dy.signum()) {
        (_, 0) => ShiftVoids::one(side(old.ymin, old.ymax)),
        (0, 1) => ShiftVoids::one(Rect::new(old.xmin, old.ymin, old.xmax, old.ymin + dy)),
        (0, _) => ShiftVoids::one(Rect::new(old.xmin, old.ymax + dy, old.xmax, old.ymax)),
        (_, 1) => ShiftVoids::two(
            Rect::new(old.xmin, old.ymin, old.xmax, old.ymin + dy),
            side(old.ymin + dy, old.ymax),
        ),
        (_, _) => ShiftVoids::two(
            Rect::new(old.xmin, old.ymax + dy, old.xmax, old.ymax),
            side(old.ymin, old.ymax + dy),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
