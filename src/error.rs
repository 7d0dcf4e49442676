//! Error types for the graphics core.
//!
//! Errors fall into three groups. Degraded conditions are clamped and the
//! call carries on; they are posted to an [`ErrorSlot`] rather than
//! returned. Caller-contract violations and resource exhaustion abort the
//! operation and are returned as `Err`.

use std::cell::{Cell, RefCell};
use std::panic::Location;

/// Axis named in a degenerate virtual-window report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// How an error affected the operation that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Value clamped, execution continued.
    Degraded,
    /// The caller passed something unusable.
    Contract,
    /// An allocation limit was hit.
    Exhausted,
}

/// Errors produced by the graphics core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrafError {
    #[error("virtual window has a zero {axis} span")]
    VirtualNullRect { axis: Axis },

    #[error("coordinate {value} overflows the device range")]
    CoordOverflow { value: i64 },

    #[error("pattern index {index} out of range, using solid")]
    PatternOutOfRange { index: usize },

    #[error("rectangle exceeds the device coordinate range")]
    OversizedRect,

    #[error("subpath {index} has invalid point count {count}")]
    EmptySubpath { index: usize, count: i32 },

    #[error("polygon needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("bezier needs 3n+1 control points, got {count}")]
    ControlPointCount { count: usize },

    #[error("subpaths declare {declared} points but only {available} were supplied")]
    PointCountMismatch { declared: usize, available: usize },

    #[error("arc angle is zero")]
    EmptyArc,

    #[error("bezier flattening needs {points} points, over the configured limit")]
    BezierBuffer { points: usize },

    #[error("cannot allocate a {width}x{height} offscreen bitmap")]
    OffscreenBitmap { width: i32, height: i32 },

    #[error("screen context is already borrowed on this thread")]
    ScreenBusy,

    #[error("fill burst must hold at least one rectangle")]
    ScanBufferTooSmall,

    #[error("config error: {0}")]
    Config(String),
}

impl GrafError {
    pub fn severity(&self) -> Severity {
        match self {
            GrafError::VirtualNullRect { .. }
            | GrafError::CoordOverflow { .. }
            | GrafError::PatternOutOfRange { .. }
            | GrafError::OversizedRect => Severity::Degraded,
            GrafError::BezierBuffer { .. }
            | GrafError::OffscreenBitmap { .. }
            | GrafError::ScanBufferTooSmall => Severity::Exhausted,
            _ => Severity::Contract,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GrafError>;

// ============================================================================
// Last-error slot
// ============================================================================

/// Holds the most recently posted error.
///
/// Posting also logs the error; with `verbose` set the caller's source
/// location is included. Posting goes through `&self` so infallible
/// conversions can report without a mutable borrow of their context.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    last: RefCell<Option<GrafError>>,
    posted: Cell<u64>,
    verbose: Cell<bool>,
}

impl ErrorSlot {
    pub fn new(verbose: bool) -> Self {
        Self {
            last: RefCell::new(None),
            posted: Cell::new(0),
            verbose: Cell::new(verbose),
        }
    }

    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.set(verbose);
    }

    /// Record `err` as the last error and log it.
    #[track_caller]
    pub fn post(&self, err: GrafError) {
        let loc = Location::caller();
        let level = match err.severity() {
            Severity::Exhausted => log::Level::Error,
            _ => log::Level::Warn,
        };
        if self.verbose.get() {
            log::log!(level, "{err} ({}:{})", loc.file(), loc.line());
        } else {
            log::log!(level, "{err}");
        }
        self.posted.set(self.posted.get() + 1);
        *self.last.borrow_mut() = Some(err);
    }

    /// Copy of the last error, if any.
    pub fn last(&self) -> Option<GrafError> {
        self.last.borrow().clone()
    }

    /// Remove and return the last error.
    pub fn take(&self) -> Option<GrafError> {
        self.last.borrow_mut().take()
    }

    /// Total number of errors posted since creation.
    pub fn posted(&self) -> u64 {
        self.posted.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_null_rect_display() {
        let e = GrafError::VirtualNullRect { axis: Axis::Y };
        assert_eq!(format!("{e}"), "virtual window has a zero y span");
    }

    #[test]
    fn test_empty_subpath_display() {
        let e = GrafError::EmptySubpath { index: 2, count: 0 };
        assert_eq!(format!("{e}"), "subpath 2 has invalid point count 0");
    }

    #[test]
    fn test_offscreen_display() {
        let e = GrafError::OffscreenBitmap {
            width: 8,
            height: 4,
        };
        assert_eq!(format!("{e}"), "cannot allocate a 8x4 offscreen bitmap");
    }

    #[test]
    fn test_config_error_display() {
        let e = GrafError::Config("bad layout".into());
        assert_eq!(format!("{e}"), "config error: bad layout");
    }

    #[test]
    fn test_severity_groups() {
        assert_eq!(
            GrafError::CoordOverflow { value: 40000 }.severity(),
            Severity::Degraded
        );
        assert_eq!(
            GrafError::TooFewPoints { count: 2 }.severity(),
            Severity::Contract
        );
        assert_eq!(GrafError::EmptyArc.severity(), Severity::Contract);
        assert_eq!(GrafError::ScreenBusy.severity(), Severity::Contract);
        assert_eq!(
            GrafError::BezierBuffer { points: 9000 }.severity(),
            Severity::Exhausted
        );
    }

    #[test]
    fn test_slot_keeps_last_and_counts() {
        let slot = ErrorSlot::new(true);
        assert!(slot.last().is_none());
        slot.post(GrafError::OversizedRect);
        slot.post(GrafError::PatternOutOfRange { index: 40 });
        assert_eq!(slot.posted(), 2);
        assert_eq!(
            slot.take(),
            Some(GrafError::PatternOutOfRange { index: 40 })
        );
        assert!(slot.last().is_none());
        assert_eq!(slot.posted(), 2);
    }
}
