//! A hook binding for one function of the game image.

use std::cell::Cell;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::str;

use crate::utils::MainThreadMarker;

/// One hook binding: the symbol naming the hooked function, the replacement
/// the host's calls get routed to, and the original function once resolved.
///
/// The production redirection mechanism lives in the hosting loader; this
/// type only records both sides of the binding so the replacement can reach
/// the original and diagnostics can name the symbol. Setting the pointer
/// again overwrites the previous value, so there is at most one active
/// original per identity.
pub struct Pointer<F> {
    ptr: Cell<Option<NonNull<c_void>>>,
    symbol: &'static [u8],
    hook_fn: *mut c_void,
    _type: PhantomData<F>,
}

// Safety: all methods are guarded with MainThreadMarker.
unsafe impl<F> Sync for Pointer<F> {}

impl<F> Pointer<F> {
    /// Creates an empty `Pointer` with a replacement function.
    ///
    /// `symbol` is the nul-terminated name of the hooked function and serves
    /// as its stable identity.
    pub const fn empty_hooked(symbol: &'static [u8], hook_fn: *mut c_void) -> Self {
        Self {
            ptr: Cell::new(None),
            symbol,
            hook_fn,
            _type: PhantomData,
        }
    }

    /// Resets the `Pointer` to the empty state.
    pub fn reset(&self, _marker: MainThreadMarker) {
        self.ptr.set(None);
    }

    /// Returns `true` if the original function has been resolved.
    pub fn is_set(&self, _marker: MainThreadMarker) -> bool {
        self.ptr.get().is_some()
    }

    /// Returns the symbol name identifying the hooked function.
    pub fn symbol(&self) -> &'static [u8] {
        self.symbol
    }

    /// Returns the symbol name as a string for diagnostics.
    pub fn name(&self) -> &'static str {
        str::from_utf8(&self.symbol[..self.symbol.len() - 1]).unwrap_or("<non-utf-8>")
    }
}

impl<F: Copy> Pointer<F> {
    /// Sets the resolved original function.
    ///
    /// # Safety
    ///
    /// `ptr` must be a valid function of type `F` at least until the
    /// `Pointer` is reset.
    pub unsafe fn set(&self, _marker: MainThreadMarker, ptr: Option<NonNull<c_void>>) {
        self.ptr.set(ptr);
    }

    /// Retrieves the original function.
    ///
    /// # Panics
    ///
    /// Panics if the `Pointer` is empty.
    pub fn get(&self, marker: MainThreadMarker) -> F {
        self.get_opt(marker).unwrap()
    }

    /// Retrieves the original function if it has been resolved.
    pub fn get_opt(&self, _marker: MainThreadMarker) -> Option<F> {
        // Safety: set() requires the stored pointer to be a valid function of
        // type F.
        self.ptr
            .get()
            .map(|ptr| unsafe { *(&ptr.as_ptr() as *const *mut c_void as *const F) })
    }
}

/// Type-erased view over hook bindings so they can live in one table.
pub trait PointerTrait: Sync {
    /// Sets the resolved original function.
    ///
    /// # Safety
    ///
    /// `ptr` must be a valid function of the binding's type at least until
    /// the binding is reset.
    unsafe fn set(&self, marker: MainThreadMarker, ptr: Option<NonNull<c_void>>);

    /// Returns `true` if the original function has been resolved.
    fn is_set(&self, marker: MainThreadMarker) -> bool;

    /// Resets the binding to the empty state.
    fn reset(&self, marker: MainThreadMarker);

    /// Returns the nul-terminated symbol name identifying the hooked
    /// function.
    fn symbol(&self) -> &'static [u8];

    /// Returns the symbol name as a string for diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the replacement the host's calls are routed to.
    fn hook_fn(&self) -> *mut c_void;

    /// Logs the binding state.
    fn log(&self, marker: MainThreadMarker);
}

impl<F: Copy> PointerTrait for Pointer<F> {
    unsafe fn set(&self, marker: MainThreadMarker, ptr: Option<NonNull<c_void>>) {
        Pointer::set(self, marker, ptr);
    }

    fn is_set(&self, marker: MainThreadMarker) -> bool {
        Pointer::is_set(self, marker)
    }

    fn reset(&self, marker: MainThreadMarker) {
        Pointer::reset(self, marker);
    }

    fn symbol(&self) -> &'static [u8] {
        Pointer::symbol(self)
    }

    fn name(&self) -> &'static str {
        Pointer::name(self)
    }

    fn hook_fn(&self) -> *mut c_void {
        self.hook_fn
    }

    fn log(&self, _marker: MainThreadMarker) {
        match self.ptr.get() {
            Some(ptr) => debug!("{} is at {:p}", self.name(), ptr.as_ptr()),
            None => debug!("{} was not found", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_POINTER: Pointer<unsafe extern "C" fn() -> i32> =
        Pointer::empty_hooked(b"test_symbol\0", std::ptr::null_mut());

    unsafe extern "C" fn forty_two() -> i32 {
        42
    }

    #[test]
    fn set_overwrites_and_reset_clears() {
        unsafe {
            let marker = MainThreadMarker::new();

            assert!(!TEST_POINTER.is_set(marker));
            assert_eq!(TEST_POINTER.name(), "test_symbol");

            TEST_POINTER.set(marker, NonNull::new(forty_two as *mut c_void));
            assert!(TEST_POINTER.is_set(marker));
            assert_eq!(TEST_POINTER.get(marker)(), 42);

            TEST_POINTER.reset(marker);
            assert!(!TEST_POINTER.is_set(marker));
            assert!(TEST_POINTER.get_opt(marker).is_none());
        }
    }
}
