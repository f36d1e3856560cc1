//! Standard starting arrangement
//!
//! Thirty-two fixed entries in placement order: light back rank, light pawns,
//! dark pawns, dark back rank. Light pieces occupy ranks 0-1, dark pieces
//! ranks 6-7.

use super::pieces::{PieceColor, PieceKind};

/// One starting-position record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutEntry {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub file: u8,
    pub rank: u8,
}

const fn entry(kind: PieceKind, color: PieceColor, file: u8, rank: u8) -> LayoutEntry {
    LayoutEntry {
        kind,
        color,
        file,
        rank,
    }
}

use PieceColor::{Black, White};
use PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};

pub const STARTING_LAYOUT: [LayoutEntry; 32] = [
    // Light back rank
    entry(Rook, White, 0, 0),
    entry(Knight, White, 1, 0),
    entry(Bishop, White, 2, 0),
    entry(Queen, White, 3, 0),
    entry(King, White, 4, 0),
    entry(Bishop, White, 5, 0),
    entry(Knight, White, 6, 0),
    entry(Rook, White, 7, 0),
    // Light pawns
    entry(Pawn, White, 0, 1),
    entry(Pawn, White, 1, 1),
    entry(Pawn, White, 2, 1),
    entry(Pawn, White, 3, 1),
    entry(Pawn, White, 4, 1),
    entry(Pawn, White, 5, 1),
    entry(Pawn, White, 6, 1),
    entry(Pawn, White, 7, 1),
    // Dark pawns
    entry(Pawn, Black, 0, 6),
    entry(Pawn, Black, 1, 6),
    entry(Pawn, Black, 2, 6),
    entry(Pawn, Black, 3, 6),
    entry(Pawn, Black, 4, 6),
    entry(Pawn, Black, 5, 6),
    entry(Pawn, Black, 6, 6),
    entry(Pawn, Black, 7, 6),
    // Dark back rank
    entry(Rook, Black, 0, 7),
    entry(Knight, Black, 1, 7),
    entry(Bishop, Black, 2, 7),
    entry(Queen, Black, 3, 7),
    entry(King, Black, 4, 7),
    entry(Bishop, Black, 5, 7),
    entry(Knight, Black, 6, 7),
    entry(Rook, Black, 7, 7),
];
