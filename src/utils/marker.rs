//! The main thread marker.

use std::marker::PhantomData;

/// Static guarantee of running on the game's main thread.
///
/// The host invokes every hook synchronously on its own thread, and all of
/// this crate's mutable state is only touched from there. Functions that rely
/// on that take an argument of this type instead of locking.
#[derive(Clone, Copy)]
pub struct MainThreadMarker {
    // Mark as !Send and !Sync.
    _marker: PhantomData<*const ()>,
}

impl MainThreadMarker {
    /// Creates a new `MainThreadMarker`.
    ///
    /// # Safety
    ///
    /// This should only be called from the main game thread.
    #[inline]
    pub unsafe fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}
