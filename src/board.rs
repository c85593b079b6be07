// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board model: a mapping from each of the 64 squares to a piece or nothing.
//!
//! A [`Board`] is a value. Every operation that "changes" a board returns a new one and leaves the receiver alone,
//! which is what lets the legality checks play out hypothetical moves on scratch boards without touching the real
//! game.

use std::{collections::BTreeMap, convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::{self, Color, Piece, PieceKind, Square},
    error::RulesError,
};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

type BoardEntries = BTreeMap<Square, Option<Piece>>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardDecodeError {
    #[error("expected 64 squares, found {0}")]
    WrongSquareCount(usize),
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardEntries", into = "BoardEntries")]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// A board with no pieces on it.
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    /// The standard starting position. Kings and rooks start out unmoved.
    pub fn initial() -> Board {
        let mut squares = [None; 64];
        for color in core::colors() {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                let sq = Square::of(color.home_row(), col as u8);
                squares[sq.index()] = Some(Piece::new(kind, color));
                let pawn_sq = Square::of(color.pawn_row(), col as u8);
                squares[pawn_sq.index()] = Some(Piece::new(PieceKind::Pawn, color));
            }
        }

        Board { squares }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns a new board with the occupant of `square` replaced.
    #[must_use]
    pub fn with_piece(&self, square: Square, piece: Option<Piece>) -> Board {
        let mut next = self.clone();
        next.squares[square.index()] = piece;
        next
    }

    #[must_use]
    pub fn without_piece(&self, square: Square) -> Board {
        self.with_piece(square, None)
    }

    /// Returns a new board where the piece on `from` has been moved onto `to`, replacing whatever stood there. A
    /// relocated rook or king is marked as moved. Relocating from an empty square only clears `to`.
    #[must_use]
    pub fn relocate(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        let piece = next.squares[from.index()].take();
        next.squares[to.index()] = piece.map(Piece::moved_now);
        next
    }

    /// Finds the king of the given color.
    pub fn king_square(&self, color: Color) -> Result<Square, RulesError> {
        self.occupied()
            .find(|(_, piece)| piece.is(PieceKind::King, color))
            .map(|(sq, _)| sq)
            .ok_or(RulesError::KingNotFound(color))
    }

    /// Iterates over every occupied square, in board order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        core::squares().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.color == color)
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|sq| sq.is_some()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl TryFrom<BoardEntries> for Board {
    type Error = BoardDecodeError;

    fn try_from(entries: BoardEntries) -> Result<Self, Self::Error> {
        if entries.len() != 64 {
            return Err(BoardDecodeError::WrongSquareCount(entries.len()));
        }

        let mut board = Board::empty();
        for (sq, piece) in entries {
            board.squares[sq.index()] = piece;
        }

        Ok(board)
    }
}

impl From<Board> for BoardEntries {
    fn from(board: Board) -> BoardEntries {
        core::squares().map(|sq| (sq, board.piece_at(sq))).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                if let Some(piece) = self.piece_at(Square::of(row, col)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", 8 - row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for col in 0..8 {
            write!(f, " {} ", Square::of(0, col).file_char())?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}
