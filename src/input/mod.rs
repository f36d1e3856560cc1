//! Input module - click selection over the placed pieces
//!
//! - `picking` - mesh ray casts filtered to piece parts, and hierarchy walking
//! - `selection` - the selection state machine and the click systems
//!
//! Rays go through Bevy's `MeshRayCast` with only piece parts as candidates, so
//! the board never blocks a piece. A click that hits nothing still reaches the
//! state machine and clears the selection.

pub mod picking;
pub mod selection;

pub use picking::*;
pub use selection::*;
