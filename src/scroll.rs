//! Scrolling a rectangle of the current port.

use crate::basics::{DrawAction, Point, Rect};
use crate::context::GrafContext;
use crate::raster::Raster;
use crate::rect_algebra::{intersect_rect, shift_rect};

impl<R: Raster> GrafContext<R> {
    /// Move the pixels inside user rectangle `r` by `(dx, dy)`.
    ///
    /// Only pixels inside `r` and the port clip change. Pixels shifted out
    /// of the rectangle are lost and the uncovered strips are erased with
    /// the back pattern. Positive `dy` moves content toward larger user Y,
    /// which is up on a lower-left port.
    pub fn scroll_rect(&mut self, r: Rect, dx: i32, dy: i32) {
        let mut gr = self.xform.user_to_global_rect(r, false, &self.errors);
        gr.normalize();
        let Some(sr) = intersect_rect(&gr, &self.global_clip()) else {
            return;
        };
        let d = self.xform.virtual_to_global_size(dx, dy, &self.errors);
        let (gdx, gdy) = if self.port.is_upper() { (d.x, d.y) } else { (d.x, -d.y) };
        if gdx == 0 && gdy == 0 {
            return;
        }
        log::debug!("scroll {:?} by ({}, {})", sr, gdx, gdy);

        let dst = sr.min_corner() + Point::new(gdx, gdy);
        self.raster.blit_self(sr, dst, &sr);

        let mut moved = sr;
        let voids = shift_rect(&mut moved, gdx, gdy);
        let mut blit = self.blit_record(DrawAction::Erase, 0);
        blit.clip = sr;
        blit.rects.extend(voids.iter().copied());
        self.fill_blit(&blit);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrafixConfig;
    use crate::grafmap::GrafMap;
    use crate::port::Orientation;
    use crate::raster::RasterOp;

    fn ctx(w: i32, h: i32) -> GrafContext<GrafMap> {
        GrafContext::new(GrafMap::new(w, h, 8), GrafixConfig::default()).unwrap()
    }

    fn put(c: &mut GrafContext<GrafMap>, x: i32, y: i32, v: u32) {
        c.raster_mut().put_pixel(x, y, v, RasterOp::Replace);
    }

    #[test]
    fn test_scroll_right_stays_inside_rect() {
        let mut c = ctx(10, 10);
        put(&mut c, 1, 1, 5);
        put(&mut c, 7, 1, 4);
        put(&mut c, 9, 1, 7);
        c.scroll_rect(Rect::new(0, 0, 8, 8), 2, 0);
        assert_eq!(c.raster().get_pixel(3, 1), 5);
        assert_eq!(c.raster().get_pixel(1, 1), 0);
        // Shifted past the rectangle edge: gone, neighbour untouched.
        assert_eq!(c.raster().get_pixel(9, 1), 7);
        assert_eq!(c.raster().count(4), 0);
    }

    #[test]
    fn test_diagonal_scroll_erases_both_strips() {
        let mut c = ctx(8, 8);
        c.set_back_color(2);
        put(&mut c, 3, 3, 5);
        c.scroll_rect(Rect::new(2, 2, 6, 6), -1, -1);
        assert_eq!(c.raster().get_pixel(2, 2), 5);
        assert_eq!(c.raster().get_pixel(3, 3), 0);
        assert_eq!(c.raster().count(2), 7);
        for x in 2..6 {
            assert_eq!(c.raster().get_pixel(x, 5), 2);
        }
        for y in 2..5 {
            assert_eq!(c.raster().get_pixel(5, y), 2);
        }
    }

    #[test]
    fn test_scroll_past_extent_erases_all() {
        let mut c = ctx(8, 8);
        c.set_back_color(1);
        put(&mut c, 0, 0, 9);
        c.scroll_rect(Rect::new(0, 0, 4, 4), 10, 0);
        assert_eq!(c.raster().count(1), 16);
        assert_eq!(c.raster().count(9), 0);
    }

    #[test]
    fn test_scroll_clipped_to_port_clip() {
        let mut c = ctx(8, 8);
        c.set_back_color(3);
        c.set_clip_rect(Rect::new(0, 0, 4, 8));
        put(&mut c, 1, 0, 5);
        c.scroll_rect(Rect::new(0, 0, 8, 1), 1, 0);
        assert_eq!(c.raster().get_pixel(2, 0), 5);
        assert_eq!(c.raster().get_pixel(0, 0), 3);
        assert_eq!(c.raster().count(3), 1);
    }

    #[test]
    fn test_lower_left_scrolls_up() {
        let mut c = ctx(8, 8);
        c.set_orientation(Orientation::LowerLeft);
        put(&mut c, 0, 4, 5);
        c.scroll_rect(Rect::new(0, 0, 8, 8), 0, 1);
        assert_eq!(c.raster().get_pixel(0, 3), 5);
        assert_eq!(c.raster().get_pixel(0, 4), 0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut c = ctx(4, 4);
        c.set_back_color(1);
        c.scroll_rect(Rect::new(0, 0, 4, 4), 0, 0);
        assert_eq!(c.raster().count(0), 16);
    }
}
