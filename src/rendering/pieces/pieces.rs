//! Piece identity types and components
//!
//! A placed piece is a root entity carrying [`PlacedPiece`] and the placement
//! `Transform`, with one child [`PiecePart`] per rendered mesh. Picking hits
//! land on the parts; the selection controller walks up to the root.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Default, Serialize, Deserialize)]
pub enum PieceColor {
    /// Light side, ranks 0-1
    #[default]
    White,
    /// Dark side, ranks 6-7
    Black,
}

impl PieceColor {
    pub fn is_light(self) -> bool {
        self == PieceColor::White
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceColor::White => "White",
            PieceColor::Black => "Black",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Default, Serialize, Deserialize)]
pub enum PieceKind {
    #[default]
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a placed piece; its presence is what marks an entity as a piece
#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlacedPiece {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub file: u8,
    pub rank: u8,
    /// e.g. "White King"
    pub display_name: String,
}

impl PlacedPiece {
    pub fn new(kind: PieceKind, color: PieceColor, file: u8, rank: u8) -> Self {
        Self {
            kind,
            color,
            file,
            rank,
            display_name: format!("{} {}", color, kind),
        }
    }

    pub fn is_light(&self) -> bool {
        self.color.is_light()
    }

    /// Algebraic square name, e.g. "e1" for file 4, rank 0
    pub fn square_name(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// A rendered mesh belonging to a placed piece
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct PiecePart;

/// Parent of every placed piece
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct PieceCollection;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_and_square() {
        let king = PlacedPiece::new(PieceKind::King, PieceColor::White, 4, 0);
        assert_eq!(king.display_name, "White King");
        assert_eq!(king.square_name(), "e1");
        assert!(king.is_light());

        let rook = PlacedPiece::new(PieceKind::Rook, PieceColor::Black, 7, 7);
        assert_eq!(rook.square_name(), "h8");
        assert!(!rook.is_light());
    }

    #[test]
    fn test_all_kinds_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
