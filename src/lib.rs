//! # grafixrs
//!
//! Software 2D rendering core for ports drawn onto in-memory or device
//! bitmaps.
//!
//! A [`GrafContext`] owns the current [`Port`], the bitmap it draws into and
//! a cached coordinate [`Transform`]. Drawing calls take user coordinates,
//! which are local or virtual depending on the port, and reduce every shape
//! to lists of global rectangles handed to the bitmap's [`Raster`] fill
//! primitive.
//!
//! ## Pipeline
//!
//! 1. **Transform** converts user points and rectangles to global space
//! 2. **Front end** builds an edge table (ovals, rounded rects, polygons,
//!    flattened beziers) or a pixel walk (lines)
//! 3. **Scan converter** turns the edge table into scanline spans under the
//!    odd/even or winding rule
//! 4. **Raster** combines the spans into pixels with the pen's raster op
//!    and pattern
//!
//! Multi-task use goes through [`Screen`], a re-entrant lock around one
//! context.

// Foundation
pub mod basics;
pub mod color;
pub mod config;
pub mod error;
pub mod math;
pub mod pattern;
pub mod rect_algebra;

// Device boundary
pub mod grafmap;
pub mod raster;

// Ports and coordinate spaces
pub mod context;
pub mod coords;
pub mod port;
pub mod screen;

// Drawing
pub mod arc;
pub mod bezier;
pub mod edges;
pub mod line;
pub mod polygon;
pub mod rect_draw;
pub mod scroll;
pub mod zoom_blit;

pub use basics::{CoordMode, DrawAction, FillRule, Point, Rect};
pub use color::RgbLayout;
pub use config::GrafixConfig;
pub use context::GrafContext;
pub use coords::Transform;
pub use error::{GrafError, Result, Severity};
pub use grafmap::GrafMap;
pub use port::{Orientation, Pen, Port};
pub use raster::{BlitRecord, Raster, RasterOp};
pub use screen::Screen;
