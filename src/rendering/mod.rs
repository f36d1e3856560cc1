//! Rendering module - the 3D chessboard scene with Bevy 0.18
//!
//! # Architecture
//!
//! - `bounds` - axis-aligned boxes over mesh vertices
//! - `materials` - shared piece, board and highlight materials
//! - `board` - coordinate mapping, board normalization and the fallback plane
//! - `pieces` - piece identity, template registry, layout and placement
//! - `camera` - camera, lights and orbit controls
//!
//! Every piece of one color shares one material handle and every duplicate of
//! a template shares one `Handle<Mesh>`; only transforms are per piece.

pub mod board;
pub mod bounds;
pub mod camera;
pub mod materials;
pub mod pieces;

pub use board::*;
pub use bounds::*;
pub use camera::*;
pub use materials::*;
pub use pieces::*;
