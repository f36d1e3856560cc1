//! UI module - Bevy UI overlays
//!
//! - **status**: the one-line status overlay (load progress, errors, placement)

pub mod status;

pub use status::*;
