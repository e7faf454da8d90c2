//! Utility objects.

use std::panic::{catch_unwind, UnwindSafe};
use std::process::abort;

pub mod main_thread_cell;
pub use main_thread_cell::MainThreadCell;

pub mod main_thread_ref_cell;
pub use main_thread_ref_cell::MainThreadRefCell;

pub mod marker;
pub use marker::MainThreadMarker;

pub mod pointer;
pub use pointer::{Pointer, PointerTrait};

pub mod variable;
pub use variable::Variable;

/// Runs the given function and aborts the process if it panics.
///
/// Unwinding across the `extern "C"` boundary back into the game is undefined
/// behavior, so every exported function wraps its body in this.
pub fn abort_on_panic<R, F: FnOnce() -> R + UnwindSafe>(f: F) -> R {
    match catch_unwind(f) {
        Ok(rv) => rv,
        Err(_) => abort(),
    }
}
