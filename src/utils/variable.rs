//! A binding for one global variable of the game image.

use std::cell::Cell;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::str;

use crate::utils::MainThreadMarker;

/// Pointer to a global variable of the game image, resolved best-effort.
///
/// Unlike a hook binding, a missing global only disables the accessors built
/// on top of it.
pub struct Variable<T> {
    ptr: Cell<Option<NonNull<T>>>,
    symbol: &'static [u8],
}

// Safety: all methods are guarded with MainThreadMarker.
unsafe impl<T> Sync for Variable<T> {}

impl<T> Variable<T> {
    /// Creates an empty `Variable` identified by a nul-terminated symbol
    /// name.
    pub const fn empty(symbol: &'static [u8]) -> Self {
        Self {
            ptr: Cell::new(None),
            symbol,
        }
    }

    /// Resets the `Variable` to the empty state.
    pub fn reset(&self, _marker: MainThreadMarker) {
        self.ptr.set(None);
    }

    /// Retrieves the stored pointer if it's present.
    pub fn get_opt(&self, _marker: MainThreadMarker) -> Option<*mut T> {
        self.ptr.get().map(NonNull::as_ptr)
    }

    /// Returns `true` if the `Variable` has a pointer stored.
    pub fn is_set(&self, _marker: MainThreadMarker) -> bool {
        self.ptr.get().is_some()
    }

    /// Returns the symbol name identifying the variable.
    pub fn symbol(&self) -> &'static [u8] {
        self.symbol
    }

    /// Returns the symbol name as a string for diagnostics.
    pub fn name(&self) -> &'static str {
        str::from_utf8(&self.symbol[..self.symbol.len() - 1]).unwrap_or("<non-utf-8>")
    }

    /// Sets the pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be a valid pointer to a variable of type `T` at least until
    /// the `Variable` is reset.
    pub unsafe fn set(&self, _marker: MainThreadMarker, ptr: Option<NonNull<c_void>>) {
        self.ptr.set(ptr.map(NonNull::cast));
    }
}
