//! Board coordinate mapping
//!
//! The canonical board is an 8x8 grid of `square_size` squares centred on the
//! world origin, lying on the XZ plane with its surface at Y = 0. Files map to
//! X and ranks map to Z; square (0, 0) is the near-left corner square and the
//! board centre (3.5, 3.5) sits exactly at the origin.

use bevy::prelude::*;

/// Squares per board edge
pub const BOARD_SQUARES: u8 = 8;

/// Canonical board dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub square_size: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self { square_size: 10.0 }
    }
}

impl BoardGeometry {
    pub fn new(square_size: f32) -> Self {
        Self { square_size }
    }

    /// Total edge length of the board (`8 * square_size`)
    pub fn dimension(&self) -> f32 {
        BOARD_SQUARES as f32 * self.square_size
    }

    /// Offset from the board centre to the centre of the first square
    fn half_span(&self) -> f32 {
        self.dimension() / 2.0 - self.square_size / 2.0
    }

    /// World X of the centre of `file`
    pub fn world_x(&self, file: u8) -> f32 {
        file as f32 * self.square_size - self.half_span()
    }

    /// World Z of the centre of `rank`
    pub fn world_z(&self, rank: u8) -> f32 {
        rank as f32 * self.square_size - self.half_span()
    }

    /// Centre of square (`file`, `rank`) on the board surface
    pub fn square_center(&self, file: u8, rank: u8) -> Vec3 {
        Vec3::new(self.world_x(file), 0.0, self.world_z(rank))
    }
}
