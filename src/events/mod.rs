//! Event types exchanged across systems.
//!
//! Submodules:
//! - [`assets`] – commands and replies for the background asset thread
//! - [`interaction`] – pointer enter/leave/hover/click notifications
pub mod assets;
pub mod interaction;
