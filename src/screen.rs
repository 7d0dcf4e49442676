//! Screen lock shared by all drawing callers.
//!
//! A [`Screen`] serializes access to one [`GrafContext`]. The lock is
//! reentrant: a thread already holding it can take it again, which only
//! bumps a nesting count. The context itself can be borrowed by one level
//! at a time; a nested level that asks for it while an outer level still
//! holds the borrow gets [`GrafError::ScreenBusy`].

use std::cell::{RefCell, RefMut};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::context::GrafContext;
use crate::error::{GrafError, Result};
use crate::raster::Raster;

fn borrow_context<R: Raster>(
    cell: &RefCell<GrafContext<R>>,
) -> Result<RefMut<'_, GrafContext<R>>> {
    cell.try_borrow_mut().map_err(|_| {
        log::warn!("{}", GrafError::ScreenBusy);
        GrafError::ScreenBusy
    })
}

pub struct Screen<R: Raster> {
    inner: ReentrantMutex<RefCell<GrafContext<R>>>,
}

/// Held screen lock. Dropping it releases one nesting level.
pub struct ScreenGuard<'a, R: Raster> {
    guard: ReentrantMutexGuard<'a, RefCell<GrafContext<R>>>,
}

impl<'a, R: Raster> ScreenGuard<'a, R> {
    /// Borrow the context. Fails with `ScreenBusy` while an outer level on
    /// this thread still holds it.
    pub fn context(&self) -> Result<RefMut<'_, GrafContext<R>>> {
        borrow_context(&self.guard)
    }
}

impl<R: Raster> Screen<R> {
    pub fn new(ctx: GrafContext<R>) -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(ctx)),
        }
    }

    /// Acquire the screen, blocking while another thread holds it.
    pub fn lock(&self) -> ScreenGuard<'_, R> {
        ScreenGuard {
            guard: self.inner.lock(),
        }
    }

    /// Run `f` with the screen held.
    ///
    /// Nests under a [`lock`](Self::lock) guard taken earlier on the same
    /// thread. Called from inside another `with`, it returns `ScreenBusy`
    /// without running `f`.
    pub fn with<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut GrafContext<R>) -> T,
    {
        let guard = self.inner.lock();
        let mut ctx = borrow_context(&guard)?;
        Ok(f(&mut ctx))
    }

    pub fn into_inner(self) -> GrafContext<R> {
        self.inner.into_inner().into_inner()
    }
}

// ============================================================================
// Tests
// ============================================================================
