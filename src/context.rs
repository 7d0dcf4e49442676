//! Graphics context: the current port, its cached transform and a bitmap.
//!
//! All drawing goes through a [`GrafContext`]. It owns exactly one port
//! and keeps the port's [`Transform`] in step with it: every mutator
//! rebuilds the transform before returning, so a conversion can never use
//! factors from an older port rectangle or virtual window.

use crate::basics::{DrawAction, FillRule, Point, Rect};
use crate::config::GrafixConfig;
use crate::coords::{self, GlobalLevel, Transform};
use crate::error::{ErrorSlot, GrafError, Result};
use crate::pattern::resolve_pattern;
use crate::port::{Orientation, Port};
use crate::raster::{BlitRecord, Raster, RasterOp};

// ============================================================================
// GrafContext
// ============================================================================

pub struct GrafContext<R: Raster> {
    pub(crate) port: Port,
    pub(crate) xform: Transform,
    pub(crate) errors: ErrorSlot,
    pub(crate) config: GrafixConfig,
    pub(crate) raster: R,
}

impl<R: Raster> GrafContext<R> {
    /// Context with a default port covering the whole bitmap.
    pub fn new(raster: R, config: GrafixConfig) -> Result<Self> {
        config.validate()?;
        let errors = ErrorSlot::new(config.verbose_errors);
        let mut port = Port::new(raster.width(), raster.height());
        port.fill_rule = config.fill_rule;
        let xform = Transform::from_port(&port, &errors);
        log::debug!(
            "context on {}x{} bitmap, {} bits",
            raster.width(),
            raster.height(),
            raster.color_bits()
        );
        Ok(Self {
            port,
            xform,
            errors,
            config,
            raster,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn port(&self) -> &Port {
        &self.port
    }

    pub fn transform(&self) -> &Transform {
        &self.xform
    }

    pub fn errors(&self) -> &ErrorSlot {
        &self.errors
    }

    pub fn config(&self) -> &GrafixConfig {
        &self.config
    }

    pub fn raster(&self) -> &R {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut R {
        &mut self.raster
    }

    pub fn into_raster(self) -> R {
        self.raster
    }

    // ------------------------------------------------------------------------
    // Port state
    // ------------------------------------------------------------------------

    /// Make `port` current, returning the previous one.
    pub fn set_port(&mut self, port: Port) -> Port {
        let old = std::mem::replace(&mut self.port, port);
        self.refresh();
        old
    }

    /// Mutate the current port in place.
    pub fn update_port<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Port),
    {
        f(&mut self.port);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.xform = Transform::from_port(&self.port, &self.errors);
        log::debug!(
            "transform rebuilt: {:?} virtual={}",
            self.xform.level(),
            self.xform.is_virtual()
        );
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.update_port(|p| p.origin = origin);
    }

    pub fn set_port_rect(&mut self, r: Rect) {
        self.update_port(|p| p.port_rect = r);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.update_port(|p| p.orientation = orientation);
    }

    /// Set the virtual window. Takes effect while virtual mode is on.
    pub fn set_virtual_rect(&mut self, r: Rect) {
        self.update_port(|p| p.virt_rect = r);
    }

    pub fn set_virtual_mode(&mut self, on: bool) {
        self.update_port(|p| p.virtual_mode = on);
    }

    /// Set the clip rectangle, given in user space, and enable clipping.
    pub fn set_clip_rect(&mut self, r: Rect) {
        let local = if self.port.virtual_mode {
            self.xform.virtual_to_local_rect(r, &self.errors)
        } else {
            r
        };
        self.update_port(|p| {
            p.clip_rect = local;
            p.clip_enabled = true;
        });
    }

    pub fn set_clip_enabled(&mut self, on: bool) {
        self.update_port(|p| p.clip_enabled = on);
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.port.fill_rule = rule;
    }

    // ------------------------------------------------------------------------
    // Pen state
    // ------------------------------------------------------------------------

    /// Pen size in user units. Sizes below one pixel become one.
    pub fn set_pen_size(&mut self, width: i32, height: i32) {
        let sz = self.xform.virtual_to_global_size(width, height, &self.errors);
        self.port.pen.size = Point::new(sz.x.max(1), sz.y.max(1));
    }

    pub fn set_pen_mode(&mut self, mode: RasterOp) {
        self.port.pen.mode = mode;
    }

    pub fn set_pen_pattern(&mut self, pattern: usize) {
        self.port.pen.pattern = self.checked_pattern(pattern);
    }

    pub fn set_pen_color(&mut self, color: u32) {
        self.port.pen.color = color;
    }

    pub fn set_back_pattern(&mut self, pattern: usize) {
        self.port.back_pattern = self.checked_pattern(pattern);
    }

    pub fn set_back_color(&mut self, color: u32) {
        self.port.back_color = color;
    }

    pub fn hide_pen(&mut self) {
        self.port.pen.level -= 1;
    }

    pub fn show_pen(&mut self) {
        self.port.pen.level += 1;
    }

    /// Move the pen to `pt` in user space.
    pub fn move_to(&mut self, pt: Point) {
        self.port.pen.location = pt;
    }

    /// Pen location in global space.
    pub fn global_pen_location(&self) -> Point {
        self.xform
            .user_to_global_point(self.port.pen.location, true, &self.errors)
    }

    /// Valid pattern for `index`, posting an error when it had to be reset.
    pub(crate) fn checked_pattern(&self, index: usize) -> usize {
        let (p, replaced) = resolve_pattern(index);
        if replaced {
            self.errors.post(GrafError::PatternOutOfRange { index });
        }
        p
    }

    // ------------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------------

    pub fn user_to_global_point(&self, pt: Point) -> Point {
        self.xform.user_to_global_point(pt, false, &self.errors)
    }

    pub fn global_to_user_point(&self, pt: Point) -> Point {
        self.xform.global_to_user_point(pt, &self.errors)
    }

    pub fn user_to_global_rect(&self, r: Rect) -> Rect {
        self.xform.user_to_global_rect(r, false, &self.errors)
    }

    pub fn global_to_user_rect(&self, r: Rect) -> Rect {
        self.xform.global_to_user_rect(r, &self.errors)
    }

    /// Convert `r` from `port`'s user space to global space. The current
    /// port is left untouched.
    pub fn port_to_global_rect(&self, port: &Port, r: Rect) -> Rect {
        coords::port_to_global_rect(port, r, &self.errors)
    }

    /// Global clip rectangle of the current port.
    pub fn global_clip(&self) -> Rect {
        coords::global_clip_rect(&self.port, self.raster.width(), self.raster.height())
    }

    /// True when user and global coordinates coincide.
    pub fn is_global(&self) -> bool {
        self.xform.level() == GlobalLevel::Global
    }

    // ------------------------------------------------------------------------
    // Blit setup
    // ------------------------------------------------------------------------

    /// Blit record for `action` with an empty rect list. `pattern` is only
    /// used by `Fill`.
    pub(crate) fn blit_record(&self, action: DrawAction, pattern: usize) -> BlitRecord {
        let pen = &self.port.pen;
        let (rop, pat) = match action {
            DrawAction::Frame | DrawAction::Paint => (pen.mode, pen.pattern),
            DrawAction::Fill => (RasterOp::Replace, self.checked_pattern(pattern)),
            DrawAction::Erase => (RasterOp::Replace, self.port.back_pattern),
            DrawAction::Invert => (RasterOp::Invert, pen.pattern),
        };
        log::trace!("blit setup {:?}: {:?} pattern {}", action, rop, pat);
        BlitRecord::new(rop, pat, pen.color, self.port.back_color, self.global_clip())
    }

    /// Hand a finished blit record to the bitmap.
    pub(crate) fn fill_blit(&mut self, blit: &BlitRecord) {
        if !blit.rects.is_empty() {
            self.raster.fill(blit);
        }
    }

    /// Scan-convert `table` into `blit`'s raster op, in bursts of the
    /// configured size.
    pub(crate) fn scan_table(
        &mut self,
        table: crate::edges::EdgeTable,
        rule: FillRule,
        blit: &mut BlitRecord,
    ) {
        let burst = self.config.fill_burst_rects;
        let raster = &mut self.raster;
        table.scan(rule, burst, |rects| {
            blit.rects.clear();
            blit.rects.extend_from_slice(rects);
            raster.fill(blit);
        });
        blit.rects.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grafmap::GrafMap;
    use crate::pattern::PATTERN_SOLID;

    fn ctx() -> GrafContext<GrafMap> {
        GrafContext::new(GrafMap::new(40, 30, 8), GrafixConfig::default()).unwrap()
    }

    #[test]
    fn test_new_covers_bitmap() {
        let c = ctx();
        assert_eq!(c.port().port_rect, Rect::new(0, 0, 40, 30));
        assert!(c.is_global());
        assert_eq!(c.global_clip(), Rect::new(0, 0, 40, 30));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let cfg = GrafixConfig {
            fill_burst_rects: 0,
            ..GrafixConfig::default()
        };
        assert!(matches!(
            GrafContext::new(GrafMap::new(4, 4, 1), cfg),
            Err(GrafError::ScanBufferTooSmall)
        ));
    }

    #[test]
    fn test_config_fill_rule_reaches_port() {
        let cfg = GrafixConfig {
            fill_rule: FillRule::Winding,
            ..GrafixConfig::default()
        };
        let c = GrafContext::new(GrafMap::new(4, 4, 1), cfg).unwrap();
        assert_eq!(c.port().fill_rule, FillRule::Winding);
    }

    #[test]
    fn test_mutators_rebuild_transform() {
        let mut c = ctx();
        c.set_origin(Point::new(5, 6));
        assert!(!c.is_global());
        assert_eq!(c.user_to_global_point(Point::new(1, 1)), Point::new(6, 7));

        c.set_virtual_rect(Rect::new(0, 0, 400, 300));
        c.set_virtual_mode(true);
        assert_eq!(c.user_to_global_point(Point::new(100, 100)), Point::new(15, 16));

        c.set_virtual_mode(false);
        assert_eq!(c.user_to_global_point(Point::new(100, 100)), Point::new(105, 106));
    }

    #[test]
    fn test_set_port_returns_previous() {
        let mut c = ctx();
        let mut other = Port::new(10, 10);
        other.origin = Point::new(20, 20);
        let old = c.set_port(other);
        assert_eq!(old.origin, Point::new(0, 0));
        assert_eq!(c.global_clip(), Rect::new(20, 20, 30, 30));
    }

    #[test]
    fn test_port_to_global_leaves_current_port() {
        let c = ctx();
        let mut other = Port::new(10, 10);
        other.origin = Point::new(3, 4);
        assert_eq!(
            c.port_to_global_rect(&other, Rect::new(0, 0, 2, 2)),
            Rect::new(3, 4, 5, 6)
        );
        assert!(c.is_global());
    }

    #[test]
    fn test_bad_pattern_resets_and_posts() {
        let mut c = ctx();
        c.set_pen_pattern(40);
        assert_eq!(c.port().pen.pattern, PATTERN_SOLID);
        assert_eq!(
            c.errors().last(),
            Some(GrafError::PatternOutOfRange { index: 40 })
        );
    }

    #[test]
    fn test_pen_level_and_location() {
        let mut c = ctx();
        c.hide_pen();
        assert!(!c.port().pen.is_visible());
        c.show_pen();
        assert!(c.port().pen.is_visible());

        c.set_origin(Point::new(2, 2));
        c.move_to(Point::new(3, 4));
        assert_eq!(c.global_pen_location(), Point::new(5, 6));
    }

    #[test]
    fn test_pen_size_scales_in_virtual_mode() {
        let mut c = ctx();
        c.set_virtual_rect(Rect::new(0, 0, 80, 60));
        c.set_virtual_mode(true);
        c.set_pen_size(6, 1);
        assert_eq!(c.port().pen.size, Point::new(3, 1));
    }

    #[test]
    fn test_clip_in_user_space() {
        let mut c = ctx();
        c.set_origin(Point::new(10, 0));
        c.set_clip_rect(Rect::new(0, 0, 5, 5));
        assert_eq!(c.global_clip(), Rect::new(10, 0, 15, 5));
        c.set_clip_enabled(false);
        assert_eq!(c.global_clip(), Rect::new(0, 0, 40, 30));
    }

    #[test]
    fn test_blit_record_per_action() {
        let mut c = ctx();
        c.set_pen_mode(RasterOp::Xor);
        c.set_back_pattern(0);
        assert_eq!(c.blit_record(DrawAction::Paint, 0).rop, RasterOp::Xor);
        assert_eq!(c.blit_record(DrawAction::Fill, 3).pattern, 3);
        assert_eq!(c.blit_record(DrawAction::Fill, 3).rop, RasterOp::Replace);
        assert_eq!(c.blit_record(DrawAction::Erase, 3).pattern, 0);
        assert_eq!(c.blit_record(DrawAction::Invert, 3).rop, RasterOp::Invert);
        assert_eq!(c.blit_record(DrawAction::Fill, 99).pattern, PATTERN_SOLID);
    }
}
