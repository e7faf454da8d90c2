#![allow(non_snake_case)]

use std::os::raw::c_int;

/// Success status the content-management calls return to the game.
pub const CELL_OK: c_int = 0;

/// Capacity of the directory-name output of the boot check, terminating nul
/// included. Documented against the host; never passed at runtime.
pub const CELL_GAME_DIRNAME_SIZE: usize = 32;

/// Capacity of each path output of the content permit, terminating nul
/// included. Documented against the host; never passed at runtime.
pub const CELL_GAME_PATH_MAX: usize = 128;

/// Content classification and size figures the boot check reports.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGameContentSize {
    pub hddFreeSizeKB: c_int,
    pub sizeKB: c_int,
    pub sysSizeKB: c_int,
}

/// The game's top-level state machine, read from the `game_state` global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    PlayerControl,
    Movie,
    CutScene,
    Menu,
    ExitRace,
    Gadgetron,
    PlanetLoading,
    CinematicMaybe,
    UnkFF,
}

impl GameState {
    /// Converts the raw value of the `game_state` global.
    pub fn from_raw(raw: c_int) -> Option<Self> {
        Some(match raw {
            0 => Self::PlayerControl,
            1 => Self::Movie,
            2 => Self::CutScene,
            3 => Self::Menu,
            4 => Self::ExitRace,
            5 => Self::Gadgetron,
            6 => Self::PlanetLoading,
            7 => Self::CinematicMaybe,
            255 => Self::UnkFF,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_state_covers_the_known_values() {
        assert_eq!(GameState::from_raw(0), Some(GameState::PlayerControl));
        assert_eq!(GameState::from_raw(6), Some(GameState::PlanetLoading));
        assert_eq!(GameState::from_raw(255), Some(GameState::UnkFF));
        assert_eq!(GameState::from_raw(8), None);
        assert_eq!(GameState::from_raw(-1), None);
    }
}
