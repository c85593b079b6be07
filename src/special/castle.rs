// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Castling.
//!
//! A king may castle towards a rook when:
//!   1. neither the king nor the rook has ever moved,
//!   2. the king is not in check,
//!   3. every square strictly between them is empty, and
//!   4. the opponent attacks neither the square the king passes over nor the one it lands on.
//!
//! The king moves two squares towards the rook and the rook lands on the square the king passed over.

use crate::{
    attacks,
    board::Board,
    core::{CastleSide, Color, PieceKind, Square, SquareSet},
    error::RulesError,
};

const SIDES: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

/// Whether both castling pieces for `side` are still unmoved on their home squares. This is what FEN calls castling
/// availability: it says nothing about whether castling is playable right now.
pub fn has_rights(board: &Board, color: Color, side: CastleSide) -> bool {
    let row = color.home_row();
    let unmoved = |sq: Square, kind: PieceKind| {
        board
            .piece_at(sq)
            .map_or(false, |p| p.is(kind, color) && !p.moved)
    };

    unmoved(Square::of(row, 4), PieceKind::King) && unmoved(Square::of(row, side.rook_col()), PieceKind::Rook)
}

/// Whether the king of `color` standing on `king_sq` may castle towards `side` right now.
pub fn is_eligible(board: &Board, king_sq: Square, color: Color, side: CastleSide) -> bool {
    match board.piece_at(king_sq) {
        Some(king) if king.is(PieceKind::King, color) && !king.moved => {}
        _ => return false,
    }

    let them = color.toggle();
    if attacks::is_square_attacked(board, king_sq, them) {
        return false;
    }

    let rook_sq = Square::of(king_sq.row(), side.rook_col());
    match board.piece_at(rook_sq) {
        Some(rook) if rook.is(PieceKind::Rook, color) && !rook.moved => {}
        _ => return false,
    }

    let (low, high) = if rook_sq.col() < king_sq.col() {
        (rook_sq.col(), king_sq.col())
    } else {
        (king_sq.col(), rook_sq.col())
    };

    if ((low + 1)..high).any(|col| !board.is_empty_at(Square::of(king_sq.row(), col))) {
        return false;
    }

    let step = side.step();
    let (passed, landed) = match (king_sq.offset(0, step), king_sq.offset(0, 2 * step)) {
        (Some(passed), Some(landed)) => (passed, landed),
        _ => return false,
    };

    !attacks::is_square_attacked(board, passed, them) && !attacks::is_square_attacked(board, landed, them)
}

/// Castling destinations for the king on `king_sq`.
pub fn destinations(board: &Board, king_sq: Square, color: Color) -> SquareSet {
    SIDES
        .iter()
        .filter(|&&side| is_eligible(board, king_sq, color, side))
        .filter_map(|&side| king_sq.offset(0, 2 * side.step()))
        .collect()
}

/// The side a king move castles towards, if it is one: the king moves exactly two files along its row.
pub fn side_for(from: Square, to: Square) -> Option<CastleSide> {
    if from.row() != to.row() {
        return None;
    }

    match to.col() as i8 - from.col() as i8 {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}

/// Relocates the king on `king_sq` and its castling rook, marking both as moved. Eligibility is not rechecked.
pub fn apply(board: &Board, king_sq: Square, side: CastleSide) -> Result<Board, RulesError> {
    let step = side.step();
    let rook_sq = Square::of(king_sq.row(), side.rook_col());
    match (king_sq.offset(0, step), king_sq.offset(0, 2 * step)) {
        (Some(rook_to), Some(king_to)) => Ok(board.relocate(king_sq, king_to).relocate(rook_sq, rook_to)),
        _ => Err(RulesError::IllegalMove {
            from: king_sq,
            to: king_sq,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use crate::fen;

    fn eligible(fen: &'static str, side: CastleSide) -> bool {
        let setup = fen::parse(fen).unwrap();
        let king_sq = setup.board.king_square(setup.to_move).unwrap();
        is_eligible(&setup.board, king_sq, setup.to_move, side)
    }

    #[test]
    fn both_sides_open() {
        assert!(eligible("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Kingside));
        assert!(eligible("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Queenside));
        assert!(eligible("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1", CastleSide::Kingside));
        assert!(eligible("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn rejected_when_king_moved() {
        let setup = fen::parse("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let board = setup.board.relocate(E1, E2).relocate(E2, E1);
        assert!(!is_eligible(&board, E1, Color::White, CastleSide::Kingside));
        assert!(!is_eligible(&board, E1, Color::White, CastleSide::Queenside));
    }

    #[test]
    fn rejected_when_rook_moved() {
        assert!(!eligible("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1", CastleSide::Kingside));
        assert!(eligible("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn rejected_when_path_occupied() {
        assert!(!eligible("4k3/8/8/8/8/8/8/R2QK1NR w KQ - 0 1", CastleSide::Kingside));
        assert!(!eligible("4k3/8/8/8/8/8/8/R2QK1NR w KQ - 0 1", CastleSide::Queenside));
        // b1 is not passed over by the king, but it still blocks.
        assert!(!eligible("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn rejected_when_in_check() {
        assert!(!eligible("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1", CastleSide::Kingside));
    }

    #[test]
    fn rejected_when_passing_through_attack() {
        assert!(!eligible("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Kingside));
        assert!(eligible("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn rejected_when_landing_on_attack() {
        assert!(!eligible("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Kingside));
        assert!(!eligible("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn attacked_rook_does_not_matter() {
        assert!(eligible("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", CastleSide::Queenside));
    }

    #[test]
    fn apply_kingside() {
        let setup = fen::parse("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let board = apply(&setup.board, E1, CastleSide::Kingside).unwrap();
        let king = board.piece_at(G1).unwrap();
        let rook = board.piece_at(F1).unwrap();
        assert!(king.is(PieceKind::King, Color::White) && king.moved);
        assert!(rook.is(PieceKind::Rook, Color::White) && rook.moved);
        assert!(board.is_empty_at(E1));
        assert!(board.is_empty_at(H1));
    }

    #[test]
    fn apply_queenside() {
        let setup = fen::parse("r3k3/8/8/8/8/8/8/4K3 b q - 0 1").unwrap();
        let board = apply(&setup.board, E8, CastleSide::Queenside).unwrap();
        assert!(board.piece_at(C8).unwrap().is(PieceKind::King, Color::Black));
        assert!(board.piece_at(D8).unwrap().is(PieceKind::Rook, Color::Black));
        assert!(board.is_empty_at(A8));
    }

    #[test]
    fn side_for_king_steps() {
        assert_eq!(Some(CastleSide::Kingside), side_for(E1, G1));
        assert_eq!(Some(CastleSide::Queenside), side_for(E8, C8));
        assert_eq!(None, side_for(E1, F1));
        assert_eq!(None, side_for(E1, G2));
    }

    #[test]
    fn rights_follow_moved_flags() {
        let setup = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        assert!(has_rights(&setup.board, Color::White, CastleSide::Kingside));
        assert!(!has_rights(&setup.board, Color::White, CastleSide::Queenside));
        assert!(!has_rights(&setup.board, Color::Black, CastleSide::Kingside));
        assert!(has_rights(&setup.board, Color::Black, CastleSide::Queenside));
    }
}
