// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack and check detection, and the legality filter built on top of it.
//!
//! A square is attacked by a color when any of that color's pieces lists it among its attack-only destinations. This
//! costs one generator call per piece, which is plenty fast for a referee.

use crate::{
    board::Board,
    core::{Color, Move, Piece, Square, SquareSet},
    movegen::{self, Mode},
    special::en_passant,
};

/// Squares holding pieces of color `by` that attack `square`.
pub fn attackers_of(board: &Board, square: Square, by: Color) -> SquareSet {
    board
        .pieces(by)
        .filter(|&(from, piece)| {
            movegen::destinations_for(board, from, piece, None, Mode::AttacksOnly).contains(square)
        })
        .map(|(from, _)| from)
        .collect()
}

pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    board.pieces(by).any(|(from, piece)| {
        movegen::destinations_for(board, from, piece, None, Mode::AttacksOnly).contains(square)
    })
}

/// Whether the king of `color` is attacked. A board with no such king counts as being in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Ok(king) => is_square_attacked(board, king, color.toggle()),
        Err(err) => {
            tracing::warn!("{}; treating as check", err);
            true
        }
    }
}

/// Plays the move from `from` to `to` on a scratch board and reports whether `color`'s king is left in check.
///
/// Only the moving piece is relocated, except that a pawn moving diagonally onto an empty square also removes the
/// pawn it captures en passant. Castling needs no special handling since the king's path is checked separately.
pub fn would_result_in_check(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let scratch = if en_passant::is_en_passant(board, from, to) {
        en_passant::apply(board, from, to).0
    } else {
        board.relocate(from, to)
    };

    is_in_check(&scratch, color)
}

/// Legal destinations for `piece` standing on `from`: its pseudo-legal destinations minus those that leave its own
/// king in check.
pub fn legal_destinations(
    board: &Board,
    from: Square,
    piece: Piece,
    last_move: Option<&Move>,
) -> SquareSet {
    movegen::destinations_for(board, from, piece, last_move, Mode::Moves)
        .iter()
        .filter(|&to| !would_result_in_check(board, from, to, piece.color))
        .collect()
}

/// Whether `color` has any legal move at all. Stops at the first one found.
pub fn has_legal_moves(board: &Board, color: Color, last_move: Option<&Move>) -> bool {
    board.pieces(color).any(|(from, piece)| {
        movegen::destinations_for(board, from, piece, last_move, Mode::Moves)
            .iter()
            .any(|to| !would_result_in_check(board, from, to, color))
    })
}

/// Every legal (from, to) pair for `color`, in board order. Pawn moves onto the last rank appear once; the promotion
/// choice is not part of the pair.
pub fn legal_moves(board: &Board, color: Color, last_move: Option<&Move>) -> Vec<(Square, Square)> {
    board
        .pieces(color)
        .flat_map(|(from, piece)| {
            legal_destinations(board, from, piece, last_move)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_move;
    use crate::core::*;
    use crate::fen;

    #[test]
    fn initial_position_has_twenty_moves() {
        let board = Board::initial();
        let moves = legal_moves(&board, Color::White, None);
        assert_eq!(20, moves.len());
        let knight_moves = moves
            .iter()
            .filter(|(from, _)| board.piece_at(*from).unwrap().kind == PieceKind::Knight)
            .count();
        assert_eq!(4, knight_moves);
    }

    #[test]
    fn every_opening_move_keeps_32_pieces() {
        let board = Board::initial();
        for (from, to) in legal_moves(&board, Color::White, None) {
            let (next, mv) = apply_move(&board, from, to, None, None).unwrap();
            assert_eq!(32, next.piece_count());
            assert_eq!(20, legal_moves(&next, Color::Black, Some(&mv)).len());
        }
    }

    #[test]
    fn pawn_attacks_squares_diagonally() {
        let setup = fen::parse("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&setup.board, D3, Color::Black));
        assert!(is_square_attacked(&setup.board, F3, Color::Black));
        assert!(!is_square_attacked(&setup.board, E3, Color::Black));
    }

    #[test]
    fn king_cannot_step_next_to_pawn_attack() {
        let setup = fen::parse("4k3/8/8/8/8/4p3/8/4K3 w - - 0 1").unwrap();
        let king = setup.board.piece_at(E1).unwrap();
        let dests = legal_destinations(&setup.board, E1, king, None);
        assert!(!dests.contains(D2));
        assert!(!dests.contains(F2));
        assert!(dests.contains(E2));
    }

    #[test]
    fn attackers_smoke() {
        let setup = fen::parse("4k3/8/8/8/1b6/8/8/R3K2N w - - 0 1").unwrap();
        let attackers = attackers_of(&setup.board, E1, Color::Black);
        assert_eq!(1, attackers.len());
        assert!(attackers.contains(B4));
        let attackers = attackers_of(&setup.board, G3, Color::White);
        assert!(attackers.contains(H1));
    }

    #[test]
    fn check_smoke() {
        let setup = fen::parse("4k3/8/8/8/1b6/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_in_check(&setup.board, Color::White));
        assert!(!is_in_check(&setup.board, Color::Black));
    }

    #[test]
    fn missing_king_counts_as_check() {
        let board = Board::initial().with_piece(E1, None);
        assert!(is_in_check(&board, Color::White));
        assert!(!has_legal_moves(&board, Color::White, None));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let setup = fen::parse("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let knight = setup.board.piece_at(E2).unwrap();
        assert!(legal_destinations(&setup.board, E2, knight, None).is_empty());
    }

    #[test]
    fn must_resolve_check() {
        let setup = fen::parse("4k3/8/8/8/8/8/3PPP2/r3K3 w - - 0 1").unwrap();
        let moves = legal_moves(&setup.board, Color::White, None);
        // Only king moves off the first rank resolve it, and d2, e2, f2 are occupied.
        assert!(moves.is_empty());
        assert!(!has_legal_moves(&setup.board, Color::White, None));
    }

    #[test]
    fn en_passant_discovered_check_is_illegal() {
        // Capturing on d6 would clear the fifth rank between the rook and the king.
        let setup = fen::parse("4k3/3p4/8/K3P2r/8/8/8/8 b - - 0 1").unwrap();
        let (board, push) = apply_move(&setup.board, D7, D5, None, None).unwrap();
        let pawn = board.piece_at(E5).unwrap();
        let dests = legal_destinations(&board, E5, pawn, Some(&push));
        assert!(!dests.contains(D6));
        assert!(dests.contains(E6));
    }
}
