//! Hooked functions.

pub mod game;
