//! Foundation types and constants.
//!
//! Integer points and rectangles in the half-open convention used by every
//! other module, plus the small enums that select drawing behaviour.

use core::ops::{Add, Sub};

// ============================================================================
// Coordinate limits
// ============================================================================

/// Largest coordinate magnitude the transform layer produces. Results that
/// would exceed it are clamped and reported as an overflow.
pub const COORD_LIMIT: i32 = 32767;

/// Clamp a wide intermediate to `[-COORD_LIMIT, COORD_LIMIT]`.
///
/// Returns the clamped value and whether clamping occurred.
#[inline]
pub fn clamp_coord(v: i64) -> (i32, bool) {
    if v > COORD_LIMIT as i64 {
        (COORD_LIMIT, true)
    } else if v < -(COORD_LIMIT as i64) {
        (-COORD_LIMIT, true)
    } else {
        (v as i32, false)
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle given by its minimum and maximum corners.
///
/// Fills treat `xmax`/`ymax` as exclusive. A rectangle with
/// `xmax <= xmin` or `ymax <= ymin` is empty, which is a valid value and
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Rect {
    /// Build a rectangle from raw bounds without normalizing.
    pub const fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// Swap bounds so that `xmin <= xmax` and `ymin <= ymax`.
    pub fn normalize(&mut self) -> &mut Self {
        if self.xmin > self.xmax {
            core::mem::swap(&mut self.xmin, &mut self.xmax);
        }
        if self.ymin > self.ymax {
            core::mem::swap(&mut self.ymin, &mut self.ymax);
        }
        self
    }

    /// Copy with the Y bounds swapped if they are inverted.
    #[inline]
    pub fn sorted_y(mut self) -> Self {
        if self.ymin > self.ymax {
            core::mem::swap(&mut self.ymin, &mut self.ymax);
        }
        self
    }

    #[inline]
    pub fn min_corner(&self) -> Point {
        Point::new(self.xmin, self.ymin)
    }

    #[inline]
    pub fn max_corner(&self) -> Point {
        Point::new(self.xmax, self.ymax)
    }

    /// Pixel count covered by a normalized rect, zero if empty.
    pub fn area(&self) -> i64 {
        if self.xmax <= self.xmin || self.ymax <= self.ymin {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }
}

// ============================================================================
// Drawing selectors
// ============================================================================

/// What a shape drawing call does with its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawAction {
    /// Outline with the current pen.
    Frame,
    /// Fill with the pen pattern and pen raster op.
    Paint,
    /// Fill with an explicit pattern, replace mode.
    Fill,
    /// Fill with the back pattern, replace mode.
    Erase,
    /// Invert the covered pixels.
    Invert,
}

/// Rule deciding which spans between edge crossings are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Alternate crossings bound filled spans.
    #[default]
    OddEven,
    /// A span is filled while the signed crossing count is non-zero.
    Winding,
}

/// How polygon vertices after the first are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordMode {
    /// Each vertex is absolute.
    #[default]
    Origin,
    /// Each vertex is a delta from the previous one.
    Previous,
}

// ============================================================================
// Tests
// ============================================================================
