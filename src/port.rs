//! Drawing port: a coordinate frame plus pen state.
//!
//! A port places a local rectangle at a global origin on its bitmap. With
//! an upper-left orientation local Y grows downward like global Y; with a
//! lower-left orientation local Y grows upward and is mirrored about the
//! port rectangle. A port can additionally map a virtual window onto its
//! rectangle.

use crate::basics::{FillRule, Point, Rect};
use crate::pattern::{PATTERN_HOLLOW, PATTERN_SOLID};
use crate::raster::RasterOp;

// ============================================================================
// Orientation
// ============================================================================

/// Where local Y = `port_rect.ymin` sits on the bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Local Y increases downward.
    #[default]
    UpperLeft,
    /// Local Y increases upward.
    LowerLeft,
}

// ============================================================================
// Pen
// ============================================================================

/// Pen used by frame and paint actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    /// Width and height in pixels. `(1, 1)` draws thin lines.
    pub size: Point,
    pub mode: RasterOp,
    pub pattern: usize,
    pub color: u32,
    /// Drawing happens only while the level is zero or above.
    pub level: i32,
    /// Current pen position in user coordinates.
    pub location: Point,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            size: Point::new(1, 1),
            mode: RasterOp::Replace,
            pattern: PATTERN_SOLID,
            color: 1,
            level: 0,
            location: Point::default(),
        }
    }
}

impl Pen {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.level >= 0
    }

    /// True when either dimension is wider than one pixel.
    #[inline]
    pub fn is_wide(&self) -> bool {
        self.size.x > 1 || self.size.y > 1
    }
}

// ============================================================================
// Port
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Global position of the port rectangle's top-left pixel.
    pub origin: Point,
    /// Port extent in local coordinates.
    pub port_rect: Rect,
    pub orientation: Orientation,
    /// Virtual window mapped onto `port_rect` while `virtual_mode` is set.
    pub virt_rect: Rect,
    pub virtual_mode: bool,
    /// Local clip, applied only while `clip_enabled` is set.
    pub clip_rect: Rect,
    pub clip_enabled: bool,
    pub fill_rule: FillRule,
    pub pen: Pen,
    pub back_pattern: usize,
    pub back_color: u32,
}

impl Port {
    /// Upper-left port covering a `width` x `height` bitmap.
    pub fn new(width: i32, height: i32) -> Self {
        let r = Rect::new(0, 0, width, height);
        Self {
            origin: Point::default(),
            port_rect: r,
            orientation: Orientation::UpperLeft,
            virt_rect: r,
            virtual_mode: false,
            clip_rect: r,
            clip_enabled: true,
            fill_rule: FillRule::OddEven,
            pen: Pen::default(),
            back_pattern: PATTERN_HOLLOW,
            back_color: 0,
        }
    }

    #[inline]
    pub fn is_upper(&self) -> bool {
        self.orientation == Orientation::UpperLeft
    }
}

// ============================================================================
// Tests
// ============================================================================
