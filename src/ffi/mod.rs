//! Raw bindings to the host's C structs and constants.
//!
//! Hand-written from the content-management ABI and the patch SDK headers
//! rather than generated; the host side is a fixed PPC image, so only the
//! layouts the hooks actually touch are declared here.

pub mod game;
