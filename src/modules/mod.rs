//! Modules providing the actual functionality.
//!
//! Each module has more or less self-contained functionality and hook
//! requirements. Every module is represented by a unit struct implementing
//! the [`Module`] trait; all of them live in the global [`MODULES`] array so
//! initialization can report them at once as trait objects.

use crate::utils::*;

pub mod content_path;
pub mod frame_tick;

/// Trait for getting module information.
pub trait Module: Sync {
    /// Returns the name of the module.
    fn name(&self) -> &'static str;

    /// Returns the description of the module.
    ///
    /// Try to return a string that would fit this phrase: "This module
    /// provides support for <description>".
    fn description(&self) -> &'static str;

    /// Returns `true` if the module is enabled.
    ///
    /// A module is enabled when every hook it runs from has been bound.
    fn is_enabled(&self, marker: MainThreadMarker) -> bool;
}

/// All modules.
pub static MODULES: &[&dyn Module] = &[&content_path::ContentPath, &frame_tick::FrameTick];
