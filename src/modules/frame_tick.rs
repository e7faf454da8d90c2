//! The injected subsystem's per-frame update.
//!
//! Runs synchronously on the game's own call into the hooked pre-frame
//! routine, once per frame, before the rest of the original routine executes.

use super::Module;
use crate::arena::Arena;
use crate::ffi::game::GameState;
use crate::hooks::game;
use crate::utils::*;

pub struct FrameTick;
impl Module for FrameTick {
    fn name(&self) -> &'static str {
        "frame_tick"
    }

    fn description(&self) -> &'static str {
        "Running the multiplayer update once per game frame."
    }

    fn is_enabled(&self, marker: MainThreadMarker) -> bool {
        game::PRE_GAME_LOOP.is_set(marker)
    }
}

static FRAME_COUNT: MainThreadCell<u64> = MainThreadCell::new(0);
static LAST_STATE: MainThreadCell<Option<GameState>> = MainThreadCell::new(None);
static ARENA: MainThreadRefCell<Option<Arena>> = MainThreadRefCell::new(None);

/// Hands the subsystem the arena it allocates from.
///
/// Called once from initialization, before any hook can fire.
pub fn attach_arena(marker: MainThreadMarker, mut arena: Arena) {
    debug!("arena: {} bytes at {:p}", arena.len(), arena.base());
    *ARENA.borrow_mut(marker) = Some(arena);
}

/// Releases the arena on shutdown.
pub fn detach_arena(marker: MainThreadMarker) {
    *ARENA.borrow_mut(marker) = None;
}

/// Returns `true` if the arena has been attached.
pub fn has_arena(marker: MainThreadMarker) -> bool {
    ARENA.borrow(marker).is_some()
}

/// Returns the number of frames the subsystem has been ticked for.
pub fn frame_count(marker: MainThreadMarker) -> u64 {
    FRAME_COUNT.get(marker)
}

/// Runs one update of the injected subsystem.
pub fn tick(marker: MainThreadMarker) {
    FRAME_COUNT.set(marker, FRAME_COUNT.get(marker) + 1);

    let state = game::game_state(marker);
    if state != LAST_STATE.get(marker) {
        debug!(
            "game state {:?} -> {:?} on frame {}",
            LAST_STATE.get(marker),
            state,
            FRAME_COUNT.get(marker)
        );
        LAST_STATE.set(marker, state);
    }

    trace!("frame {}", FRAME_COUNT.get(marker));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_attaches_and_detaches() {
        unsafe {
            let marker = MainThreadMarker::new();

            assert!(!has_arena(marker));

            attach_arena(marker, Arena::new(64));
            assert!(has_arena(marker));
            assert_eq!(ARENA.borrow(marker).as_ref().map(Arena::len), Some(64));

            detach_arena(marker);
            assert!(!has_arena(marker));
        }
    }
}
