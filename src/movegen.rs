// Copyright 2021-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation, one generator per piece kind.
//!
//! Generators answer "where could this piece go if its own king's safety did not matter?". Filtering out moves that
//! leave the mover in check is the job of [`crate::attacks`].

use crate::board::Board;
use crate::core::*;
use crate::special::{castle, en_passant};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// What a generator is being asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every square the piece may move to.
    Moves,
    /// Only the squares the piece attacks. Pawns report both diagonals whether or not anything stands there and
    /// never report pushes; kings never report castling.
    AttacksOnly,
}

fn can_land(board: &Board, to: Square, us: Color) -> bool {
    board.piece_at(to).map_or(true, |p| p.color != us)
}

/// Walks each ray outward from `from`, stopping at the first occupied square. That square is included only if an
/// enemy piece stands on it.
pub fn slider_destinations(
    board: &Board,
    from: Square,
    us: Color,
    directions: &[Direction],
) -> SquareSet {
    let mut dests = SquareSet::empty();
    for &dir in directions {
        let mut cursor = from.towards(dir);
        while let Some(sq) = cursor {
            match board.piece_at(sq) {
                None => dests.insert(sq),
                Some(piece) => {
                    if piece.color != us {
                        dests.insert(sq);
                    }

                    break;
                }
            }

            cursor = sq.towards(dir);
        }
    }

    dests
}

pub fn knight_destinations(board: &Board, from: Square, us: Color) -> SquareSet {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(drow, dcol)| from.offset(drow, dcol))
        .filter(|&sq| can_land(board, sq, us))
        .collect()
}

pub fn bishop_destinations(board: &Board, from: Square, us: Color) -> SquareSet {
    slider_destinations(board, from, us, &DIAGONALS)
}

pub fn rook_destinations(board: &Board, from: Square, us: Color) -> SquareSet {
    slider_destinations(board, from, us, &ORTHOGONALS)
}

pub fn queen_destinations(board: &Board, from: Square, us: Color) -> SquareSet {
    slider_destinations(board, from, us, &ALL_DIRECTIONS)
}

pub fn king_destinations(board: &Board, from: Square, us: Color, mode: Mode) -> SquareSet {
    let mut dests: SquareSet = ALL_DIRECTIONS
        .iter()
        .filter_map(|&dir| from.towards(dir))
        .filter(|&sq| can_land(board, sq, us))
        .collect();

    if mode == Mode::Moves {
        dests |= castle::destinations(board, from, us);
    }

    dests
}

pub fn pawn_destinations(
    board: &Board,
    from: Square,
    us: Color,
    last_move: Option<&Move>,
    mode: Mode,
) -> SquareSet {
    let step = us.pawn_step();
    let mut dests = SquareSet::empty();
    for dcol in [-1, 1] {
        if let Some(sq) = from.offset(step, dcol) {
            let enemy_there = board.piece_at(sq).map_or(false, |p| p.color != us);
            if mode == Mode::AttacksOnly || enemy_there {
                dests.insert(sq);
            }
        }
    }

    if mode == Mode::AttacksOnly {
        return dests;
    }

    if let Some(sq) = en_passant::capture_destination(board, from, us, last_move) {
        dests.insert(sq);
    }

    if let Some(single) = from.offset(step, 0).filter(|&sq| board.is_empty_at(sq)) {
        dests.insert(single);
        if from.row() == us.pawn_row() {
            if let Some(double) = single.offset(step, 0).filter(|&sq| board.is_empty_at(sq)) {
                dests.insert(double);
            }
        }
    }

    dests
}

/// Dispatches to the generator for `piece`, as if it stood on `from`.
pub fn destinations_for(
    board: &Board,
    from: Square,
    piece: Piece,
    last_move: Option<&Move>,
    mode: Mode,
) -> SquareSet {
    let us = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn_destinations(board, from, us, last_move, mode),
        PieceKind::Knight => knight_destinations(board, from, us),
        PieceKind::Bishop => bishop_destinations(board, from, us),
        PieceKind::Rook => rook_destinations(board, from, us),
        PieceKind::Queen => queen_destinations(board, from, us),
        PieceKind::King => king_destinations(board, from, us, mode),
    }
}

/// Pseudo-legal destinations of whatever stands on `from`. An empty square has none.
pub fn pseudo_legal_destinations(
    board: &Board,
    from: Square,
    last_move: Option<&Move>,
    mode: Mode,
) -> SquareSet {
    match board.piece_at(from) {
        Some(piece) => destinations_for(board, from, piece, last_move, mode),
        None => SquareSet::empty(),
    }
}
