//! Coordinate transforms between local, global, virtual and user space.
//!
//! Global space is bitmap pixels with Y down. Local space is relative to a
//! port rectangle placed at the port origin, mirrored vertically for
//! lower-left ports. Virtual space is a window linearly scaled onto the
//! port rectangle. User space is virtual space when the port is in virtual
//! mode and local space otherwise.
//!
//! [`Transform`] caches the per-port constants. It is rebuilt from the port
//! whenever the port changes, so no conversion ever sees stale factors.

use crate::basics::{clamp_coord, Point, Rect, COORD_LIMIT};
use crate::error::{Axis, ErrorSlot, GrafError};
use crate::port::Port;

// ============================================================================
// Per-axis virtual scale
// ============================================================================

/// `port_span / virt_span` with a half-up rounding bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisScale {
    numer: i64,
    denom: i64,
    round: i64,
}

impl AxisScale {
    fn new(port_span: i32, virt_span: i32, axis: Axis, errors: &ErrorSlot) -> Self {
        let mut s = Self {
            numer: port_span as i64,
            denom: 1,
            round: 0,
        };
        if s.numer == 0 {
            errors.post(GrafError::VirtualNullRect { axis });
        } else if virt_span == 0 {
            s.numer = 0;
            errors.post(GrafError::VirtualNullRect { axis });
        } else {
            s.denom = virt_span as i64;
            s.round = s.denom >> 1;
        }
        s
    }

    /// Virtual distance to port distance.
    #[inline]
    fn forward(&self, d: i64) -> i64 {
        (d * self.numer + self.round) / self.denom
    }

    /// Port distance to virtual distance; `None` for a degenerate axis.
    #[inline]
    fn inverse(&self, d: i64) -> Option<i64> {
        if self.numer == 0 {
            None
        } else {
            Some((d * self.denom + (self.numer >> 1)) / self.numer)
        }
    }
}

#[inline]
fn clamp_posting(v: i64, errors: &ErrorSlot) -> i32 {
    let (c, clamped) = clamp_coord(v);
    if clamped {
        errors.post(GrafError::CoordOverflow { value: v });
    }
    c
}

// ============================================================================
// GlobalLevel
// ============================================================================

/// Whether user coordinates need converting at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalLevel {
    /// User space coincides with global space.
    Global,
    /// User coordinates must be converted.
    User,
}

// ============================================================================
// Transform
// ============================================================================

/// Cached conversion constants for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    origin: Point,
    port_rect: Rect,
    virt_rect: Rect,
    upper: bool,
    virtual_mode: bool,
    local_x: i32,
    local_y: i32,
    x: AxisScale,
    y: AxisScale,
    virt_x: i32,
    virt_y: i32,
    level: GlobalLevel,
}

impl Transform {
    /// Compute the constants for `port`. A zero span on either axis of
    /// the port rectangle or the virtual window posts `VirtualNullRect`
    /// and degrades that axis to a scale of zero.
    pub fn from_port(port: &Port, errors: &ErrorSlot) -> Self {
        let r = port.port_rect;
        let v = port.virt_rect;
        let upper = port.is_upper();

        let local_x = port.origin.x - r.xmin;
        let local_y = if upper {
            port.origin.y - r.ymin
        } else {
            port.origin.y + r.ymax
        };

        let (x, y) = if port.virtual_mode {
            (
                AxisScale::new(r.width(), v.width(), Axis::X, errors),
                AxisScale::new(r.height(), v.height(), Axis::Y, errors),
            )
        } else {
            let unit = AxisScale {
                numer: 1,
                denom: 1,
                round: 0,
            };
            (unit, unit)
        };

        let virt_y = if upper {
            port.origin.y
        } else {
            port.origin.y + r.height()
        };

        let level = if !port.virtual_mode && upper && local_x == 0 && local_y == 0 {
            GlobalLevel::Global
        } else {
            GlobalLevel::User
        };

        log::debug!(
            "transform: origin=({}, {}) local=({local_x}, {local_y}) scale x={}/{} y={}/{} {:?}",
            port.origin.x,
            port.origin.y,
            x.numer,
            x.denom,
            y.numer,
            y.denom,
            level
        );

        Self {
            origin: port.origin,
            port_rect: r,
            virt_rect: v,
            upper,
            virtual_mode: port.virtual_mode,
            local_x,
            local_y,
            x,
            y,
            virt_x: port.origin.x,
            virt_y,
            level,
        }
    }

    #[inline]
    pub fn level(&self) -> GlobalLevel {
        self.level
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.virtual_mode
    }

    // ------------------------------------------------------------------------
    // Local <-> global
    // ------------------------------------------------------------------------

    pub fn local_to_global_point(&self, pt: Point) -> Point {
        let y = if self.upper {
            pt.y + self.local_y
        } else {
            self.local_y - 1 - pt.y
        };
        Point::new(pt.x + self.local_x, y)
    }

    pub fn global_to_local_point(&self, pt: Point) -> Point {
        let y = if self.upper {
            pt.y - self.local_y
        } else {
            self.local_y - 1 - pt.y
        };
        Point::new(pt.x - self.local_x, y)
    }

    /// Both corners converted; Y bounds swap for lower-left ports.
    pub fn local_to_global_rect(&self, r: Rect) -> Rect {
        let a = self.local_to_global_point(r.min_corner());
        let b = self.local_to_global_point(r.max_corner());
        if self.upper {
            Rect::new(a.x, a.y, b.x, b.y)
        } else {
            Rect::new(a.x, b.y, b.x, a.y)
        }
    }

    pub fn global_to_local_rect(&self, r: Rect) -> Rect {
        let a = self.global_to_local_point(r.min_corner());
        let b = self.global_to_local_point(r.max_corner());
        if self.upper {
            Rect::new(a.x, a.y, b.x, b.y)
        } else {
            Rect::new(a.x, b.y, b.x, a.y)
        }
    }

    // ------------------------------------------------------------------------
    // Virtual <-> global
    // ------------------------------------------------------------------------

    /// Scale a virtual point onto the port, clamping to the coordinate
    /// limit and posting `CoordOverflow` when it does.
    pub fn virtual_to_global_point(&self, pt: Point, errors: &ErrorSlot) -> Point {
        let gx = self.x.forward(pt.x as i64 - self.virt_rect.xmin as i64) + self.virt_x as i64;
        let s = self.y.forward(pt.y as i64 - self.virt_rect.ymin as i64);
        let s = if self.upper { s } else { -s - 1 };
        let gy = s + self.virt_y as i64;
        Point::new(clamp_posting(gx, errors), clamp_posting(gy, errors))
    }

    /// Inverse of [`virtual_to_global_point`](Self::virtual_to_global_point).
    /// A degenerate axis yields the coordinate limit matching the sign of
    /// the input.
    pub fn global_to_virtual_point(&self, pt: Point, errors: &ErrorSlot) -> Point {
        let x = match self.x.inverse(pt.x as i64 - self.origin.x as i64) {
            Some(d) => clamp_posting(d + self.virt_rect.xmin as i64, errors),
            None => {
                errors.post(GrafError::CoordOverflow { value: pt.x as i64 });
                if pt.x < 0 {
                    -COORD_LIMIT
                } else {
                    COORD_LIMIT
                }
            }
        };
        let mut t = pt.y as i64 - self.origin.y as i64;
        if !self.upper {
            t = self.port_rect.height() as i64 - 1 - t;
        }
        let y = match self.y.inverse(t) {
            Some(d) => clamp_posting(d + self.virt_rect.ymin as i64, errors),
            None => {
                errors.post(GrafError::CoordOverflow { value: pt.y as i64 });
                if pt.y < 0 {
                    -COORD_LIMIT
                } else {
                    COORD_LIMIT
                }
            }
        };
        Point::new(x, y)
    }

    pub fn virtual_to_global_rect(&self, r: Rect, errors: &ErrorSlot) -> Rect {
        let a = self.virtual_to_global_point(r.min_corner(), errors);
        let b = self.virtual_to_global_point(r.max_corner(), errors);
        if self.upper {
            Rect::new(a.x, a.y, b.x, b.y)
        } else {
            Rect::new(a.x, b.y, b.x, a.y)
        }
    }

    pub fn global_to_virtual_rect(&self, r: Rect, errors: &ErrorSlot) -> Rect {
        let a = self.global_to_virtual_point(r.min_corner(), errors);
        let b = self.global_to_virtual_point(r.max_corner(), errors);
        Rect::new(a.x, a.y, b.x, b.y).sorted_y()
    }

    // ------------------------------------------------------------------------
    // Local <-> virtual, through global
    // ------------------------------------------------------------------------

    pub fn local_to_virtual_point(&self, pt: Point, errors: &ErrorSlot) -> Point {
        self.global_to_virtual_point(self.local_to_global_point(pt), errors)
    }

    pub fn virtual_to_local_point(&self, pt: Point, errors: &ErrorSlot) -> Point {
        self.global_to_local_point(self.virtual_to_global_point(pt, errors))
    }

    pub fn local_to_virtual_rect(&self, r: Rect, errors: &ErrorSlot) -> Rect {
        self.global_to_virtual_rect(self.local_to_global_rect(r), errors)
    }

    pub fn virtual_to_local_rect(&self, r: Rect, errors: &ErrorSlot) -> Rect {
        self.global_to_local_rect(self.virtual_to_global_rect(r, errors))
    }

    // ------------------------------------------------------------------------
    // User space
    // ------------------------------------------------------------------------

    /// User point to global. With `frame` set, lower-left ports move the
    /// result up one row so inclusive frame edges land inside the shape.
    pub fn user_to_global_point(&self, pt: Point, frame: bool, errors: &ErrorSlot) -> Point {
        if self.level == GlobalLevel::Global {
            return pt;
        }
        let mut g = if self.virtual_mode {
            self.virtual_to_global_point(pt, errors)
        } else {
            self.local_to_global_point(pt)
        };
        if frame && !self.upper {
            g.y -= 1;
        }
        g
    }

    pub fn global_to_user_point(&self, pt: Point, errors: &ErrorSlot) -> Point {
        match (self.level, self.virtual_mode) {
            (GlobalLevel::Global, _) => pt,
            (_, true) => self.global_to_virtual_point(pt, errors),
            (_, false) => self.global_to_local_point(pt),
        }
    }

    pub fn user_to_global_rect(&self, r: Rect, frame: bool, errors: &ErrorSlot) -> Rect {
        if self.level == GlobalLevel::Global {
            return r;
        }
        let mut g = if self.virtual_mode {
            self.virtual_to_global_rect(r, errors)
        } else {
            self.local_to_global_rect(r)
        };
        if frame && !self.upper {
            g.ymin -= 1;
            g.ymax -= 1;
        }
        g
    }

    pub fn global_to_user_rect(&self, r: Rect, errors: &ErrorSlot) -> Rect {
        match (self.level, self.virtual_mode) {
            (GlobalLevel::Global, _) => r,
            (_, true) => self.global_to_virtual_rect(r, errors),
            (_, false) => self.global_to_local_rect(r),
        }
    }

    /// Scale a virtual extent to pixels. Identity outside virtual mode.
    pub fn virtual_to_global_size(&self, dx: i32, dy: i32, errors: &ErrorSlot) -> Point {
        if !self.virtual_mode {
            return Point::new(dx, dy);
        }
        Point::new(
            clamp_posting(self.x.forward(dx as i64), errors),
            clamp_posting(self.y.forward(dy as i64), errors),
        )
    }
}

// ============================================================================
// Port-level helpers
// ============================================================================

/// Convert a rectangle in `port`'s user space to global space, whichever
/// port is current.
pub fn port_to_global_rect(port: &Port, r: Rect, errors: &ErrorSlot) -> Rect {
    Transform::from_port(port, errors).user_to_global_rect(r, false, errors)
}

/// Global clip rectangle for `port` on a bitmap of `width` x `height`.
///
/// With clipping disabled this is the whole bitmap. Otherwise the port
/// clip is intersected with the port rectangle in local space, moved to
/// global space, and clamped to the bitmap.
pub fn global_clip_rect(port: &Port, width: i32, height: i32) -> Rect {
    if !port.clip_enabled {
        return Rect::new(0, 0, width, height);
    }
    let pr = port.port_rect;
    let pc = port.clip_rect;
    let mut c = Rect::new(
        pr.xmin.max(pc.xmin),
        pr.ymin.max(pc.ymin),
        pr.xmax.min(pc.xmax),
        pr.ymax.min(pc.ymax),
    );

    let dx = port.origin.x - pr.xmin;
    c.xmin += dx;
    c.xmax += dx;
    if port.is_upper() {
        let dy = port.origin.y - pr.ymin;
        c.ymin += dy;
        c.ymax += dy;
    } else {
        let t = port.origin.y + pr.ymax;
        c = Rect::new(c.xmin, t - c.ymax, c.xmax, t - c.ymin);
    }
    c.normalize();

    if c.xmin < 0 {
        c.xmin = 0;
        c.xmax = c.xmax.max(0);
    }
    if c.ymin < 0 {
        c.ymin = 0;
        c.ymax = c.ymax.max(0);
    }
    if c.xmax >= width {
        c.xmax = width;
        c.xmin = c.xmin.min(width);
    }
    if c.ymax >= height {
        c.ymax = height;
        c.ymin = c.ymin.min(height);
    }
    c
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Orientation;

    fn offset_port() -> Port {
        let mut port = Port::new(100, 50);
        port.origin = Point::new(10, 20);
        port
    }

    fn lower_port() -> Port {
        let mut port = Port::new(100, 50);
        port.orientation = Orientation::LowerLeft;
        port
    }

    fn virtual_port(virt: Rect) -> Port {
        let mut port = Port::new(100, 100);
        port.virt_rect = virt;
        port.virtual_mode = true;
        port
    }

    #[test]
    fn test_identity_port_is_global_level() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&Port::new(10, 10), &errors);
        assert_eq!(t.level(), GlobalLevel::Global);
        let p = Point::new(3, 7);
        assert_eq!(t.user_to_global_point(p, true, &errors), p);
    }

    #[test]
    fn test_local_upper_offset() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&offset_port(), &errors);
        assert_eq!(t.level(), GlobalLevel::User);
        assert_eq!(t.local_to_global_point(Point::new(5, 5)), Point::new(15, 25));
        assert_eq!(
            t.local_to_global_rect(Rect::new(0, 0, 4, 4)),
            Rect::new(10, 20, 14, 24)
        );
    }

    #[test]
    fn test_local_lower_mirrors() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&lower_port(), &errors);
        assert_eq!(t.local_to_global_point(Point::new(0, 0)), Point::new(0, 49));
        assert_eq!(t.local_to_global_point(Point::new(0, 49)), Point::new(0, 0));
        assert_eq!(
            t.local_to_global_rect(Rect::new(0, 0, 10, 10)),
            Rect::new(0, 39, 10, 49)
        );
        assert_eq!(
            t.global_to_local_rect(Rect::new(0, 39, 10, 49)),
            Rect::new(0, 0, 10, 10)
        );
    }

    #[test]
    fn test_frame_adjust_lower_only() {
        let errors = ErrorSlot::default();
        let lower = Transform::from_port(&lower_port(), &errors);
        assert_eq!(
            lower.user_to_global_point(Point::new(0, 0), true, &errors),
            Point::new(0, 48)
        );
        assert_eq!(
            lower.user_to_global_rect(Rect::new(0, 0, 10, 10), true, &errors),
            Rect::new(0, 38, 10, 48)
        );
        let upper = Transform::from_port(&offset_port(), &errors);
        assert_eq!(
            upper.user_to_global_point(Point::new(0, 0), true, &errors),
            Point::new(10, 20)
        );
    }

    #[test]
    fn test_virtual_scaling() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&virtual_port(Rect::new(0, 0, 1000, 1000)), &errors);
        assert_eq!(
            t.virtual_to_global_point(Point::new(500, 250), &errors),
            Point::new(50, 25)
        );
        assert_eq!(
            t.global_to_virtual_point(Point::new(50, 25), &errors),
            Point::new(500, 250)
        );
        assert_eq!(
            t.user_to_global_rect(Rect::new(0, 0, 1000, 500), false, &errors),
            Rect::new(0, 0, 100, 50)
        );
        assert_eq!(t.virtual_to_global_size(200, 40, &errors), Point::new(20, 4));
        assert_eq!(errors.posted(), 0);
    }

    #[test]
    fn test_virtual_offset_window() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&virtual_port(Rect::new(-50, -50, 50, 50)), &errors);
        assert_eq!(
            t.virtual_to_global_point(Point::new(0, 0), &errors),
            Point::new(50, 50)
        );
        assert_eq!(
            t.global_to_user_point(Point::new(0, 0), &errors),
            Point::new(-50, -50)
        );
    }

    #[test]
    fn test_virtual_lower_orientation() {
        let errors = ErrorSlot::default();
        let mut port = virtual_port(Rect::new(0, 0, 10, 10));
        port.orientation = Orientation::LowerLeft;
        let t = Transform::from_port(&port, &errors);
        // Virtual y = 0 lands on the bottom row of the port.
        assert_eq!(
            t.virtual_to_global_point(Point::new(0, 0), &errors),
            Point::new(0, 99)
        );
        assert_eq!(
            t.global_to_virtual_point(Point::new(0, 99), &errors),
            Point::new(0, 0)
        );
    }

    #[test]
    fn test_virtual_overflow_clamps_and_posts() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&virtual_port(Rect::new(0, 0, 1, 1)), &errors);
        let g = t.virtual_to_global_point(Point::new(1000, -1000), &errors);
        assert_eq!(g, Point::new(COORD_LIMIT, -COORD_LIMIT));
        assert_eq!(errors.posted(), 2);
        assert_eq!(errors.last(), Some(GrafError::CoordOverflow { value: -100000 }));
    }

    #[test]
    fn test_null_virtual_window_degrades() {
        let errors = ErrorSlot::default();
        let t = Transform::from_port(&virtual_port(Rect::new(0, 0, 0, 100)), &errors);
        assert_eq!(errors.take(), Some(GrafError::VirtualNullRect { axis: Axis::X }));
        // Zero numerator collapses X onto the origin.
        assert_eq!(
            t.virtual_to_global_point(Point::new(40, 10), &errors),
            Point::new(0, 10)
        );
        // The inverse has nothing to divide by.
        assert_eq!(
            t.global_to_virtual_point(Point::new(-3, 10), &errors),
            Point::new(-COORD_LIMIT, 10)
        );
        assert_eq!(errors.last(), Some(GrafError::CoordOverflow { value: -3 }));
    }

    #[test]
    fn test_null_port_rect_degrades() {
        let errors = ErrorSlot::default();
        let mut port = virtual_port(Rect::new(0, 0, 10, 10));
        port.port_rect = Rect::new(0, 0, 10, 0);
        Transform::from_port(&port, &errors);
        assert_eq!(errors.last(), Some(GrafError::VirtualNullRect { axis: Axis::Y }));
    }

    #[test]
    fn test_port_to_global_rect_uses_given_port() {
        let errors = ErrorSlot::default();
        let other = offset_port();
        assert_eq!(
            port_to_global_rect(&other, Rect::new(1, 2, 3, 4), &errors),
            Rect::new(11, 22, 13, 24)
        );
    }

    #[test]
    fn test_global_clip_disabled_is_bitmap() {
        let mut port = offset_port();
        port.clip_enabled = false;
        assert_eq!(global_clip_rect(&port, 320, 200), Rect::new(0, 0, 320, 200));
    }

    #[test]
    fn test_global_clip_intersects_and_clamps() {
        let mut port = offset_port();
        port.clip_rect = Rect::new(-20, 10, 60, 500);
        // Local (0,10)-(60,50) moves by (10,20) to (10,30)-(70,70).
        assert_eq!(global_clip_rect(&port, 320, 200), Rect::new(10, 30, 70, 70));
        // A bitmap narrower than the clip clamps it.
        assert_eq!(global_clip_rect(&port, 40, 50), Rect::new(10, 30, 40, 50));
    }

    #[test]
    fn test_global_clip_fully_outside() {
        let mut port = Port::new(100, 100);
        port.origin = Point::new(-200, -200);
        assert_eq!(global_clip_rect(&port, 50, 50), Rect::new(0, 0, 0, 0));
    }

    #[test]
    fn test_global_clip_lower_orientation() {
        let mut port = lower_port();
        port.clip_rect = Rect::new(0, 0, 100, 10);
        // The bottom ten local rows are the last ten global rows.
        assert_eq!(global_clip_rect(&port, 100, 50), Rect::new(0, 40, 100, 50));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn orientation() -> impl Strategy<Value = Orientation> {
            prop_oneof![Just(Orientation::UpperLeft), Just(Orientation::LowerLeft)]
        }

        proptest! {
            #[test]
            fn local_round_trip(
                ox in -500i32..500, oy in -500i32..500,
                xmin in -100i32..100, ymin in -100i32..100,
                w in 1i32..300, h in 1i32..300,
                orient in orientation(),
                px in -1000i32..1000, py in -1000i32..1000,
            ) {
                let errors = ErrorSlot::default();
                let mut port = Port::new(0, 0);
                port.origin = Point::new(ox, oy);
                port.port_rect = Rect::new(xmin, ymin, xmin + w, ymin + h);
                port.orientation = orient;
                let t = Transform::from_port(&port, &errors);
                let p = Point::new(px, py);
                prop_assert_eq!(t.global_to_local_point(t.local_to_global_point(p)), p);
                let r = Rect::new(px, py, px + w, py + h);
                prop_assert_eq!(t.global_to_local_rect(t.local_to_global_rect(r)), r);
            }

            #[test]
            fn virtual_round_trip_within_one(
                pw in 1i32..400, ph in 1i32..400,
                extra_w in 0i32..2000, extra_h in 0i32..2000,
                vx in -1000i32..1000, vy in -1000i32..1000,
                orient in orientation(),
                fx in 0.0f64..1.0, fy in 0.0f64..1.0,
            ) {
                // Virtual window at least as fine as the port.
                let errors = ErrorSlot::default();
                let mut port = Port::new(pw, ph);
                port.origin = Point::new(7, 3);
                port.virt_rect = Rect::new(vx, vy, vx + pw + extra_w, vy + ph + extra_h);
                port.virtual_mode = true;
                port.orientation = orient;
                let t = Transform::from_port(&port, &errors);
                let g = Point::new(
                    7 + (fx * (pw - 1) as f64) as i32,
                    3 + (fy * (ph - 1) as f64) as i32,
                );
                let back = t.virtual_to_global_point(t.global_to_virtual_point(g, &errors), &errors);
                prop_assert!((back.x - g.x).abs() <= 1, "{:?} -> {:?}", g, back);
                prop_assert!((back.y - g.y).abs() <= 1, "{:?} -> {:?}", g, back);
                prop_assert_eq!(errors.posted(), 0);
            }
        }
    }
}
