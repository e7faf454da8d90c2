//! Multiplayer patch layer for the Ratchet & Clank 3 HD game image.
//!
//! Linked into the patch module the hosting loader injects next to the fixed
//! game executable. The host calls [`rc3_init`] once before the game reaches
//! any hooked entry point and [`rc3_shutdown`] (nominally) at process end;
//! everything in between runs on the game's own calls into the hooks.

#[macro_use]
extern crate log;

pub mod arena;
pub mod ffi;
pub mod hooks;
pub mod modules;
pub mod utils;

use std::process::abort;

use crate::arena::{Arena, ARENA_SIZE};
use crate::utils::*;

/// Initializes the patch layer.
///
/// Sets up logging, reserves the subsystem's memory arena and binds all game
/// hooks. The hosting environment calls this exactly once, single-threaded,
/// before the game can reach any hooked entry point. A hook that cannot be
/// bound leaves the patch unable to run correctly, so that aborts the process
/// rather than continuing partially hooked.
#[no_mangle]
pub unsafe extern "C" fn rc3_init() {
    abort_on_panic(move || {
        let marker = MainThreadMarker::new();

        let _ = pretty_env_logger::try_init();

        info!("rc3-rs {} initializing", env!("CARGO_PKG_VERSION"));

        modules::frame_tick::attach_arena(marker, Arena::new(ARENA_SIZE));

        if let Err(err) = hooks::game::find_pointers(marker) {
            error!("could not bind the game hooks: {err:?}");
            abort();
        }

        for module in modules::MODULES {
            debug!(
                "{}: {} ({})",
                module.name(),
                if module.is_enabled(marker) {
                    "enabled"
                } else {
                    "disabled"
                },
                module.description()
            );
        }

        info!("bound {} hooks", hooks::game::HOOKS.len());
    })
}

/// Reverses [`rc3_init`].
///
/// Declared for symmetry with initialization. The hosting environment only
/// calls this when the process is going away, where un-hooking no longer
/// matters, so nothing is released here. `hooks::game::reset_pointers` and
/// `modules::frame_tick::detach_arena` exist for when that changes.
#[no_mangle]
pub unsafe extern "C" fn rc3_shutdown() {
    abort_on_panic(move || {
        info!("rc3-rs shutting down");
    })
}
