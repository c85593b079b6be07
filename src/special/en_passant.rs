// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! En passant.
//!
//! A pawn standing on its fifth rank may capture an enemy pawn that has just advanced two squares to land beside it.
//! The capturing pawn moves diagonally onto the empty square the enemy pawn passed over, and the enemy pawn is removed
//! from the square it actually occupies.

use crate::{
    board::Board,
    core::{Color, Move, MoveFlags, Piece, PieceKind, Square},
};

fn is_double_step(mv: &Move) -> bool {
    mv.piece.kind == PieceKind::Pawn
        && mv.from.col() == mv.to.col()
        && (mv.from.row() as i8 - mv.to.row() as i8).abs() == 2
}

/// The row a pawn of `color` must stand on to capture en passant.
fn fifth_row(color: Color) -> u8 {
    (color.pawn_row() as i8 + 3 * color.pawn_step()) as u8
}

/// The square passed over by a pawn that has just advanced two squares, if `last_move` was such an advance.
pub fn target_square(last_move: Option<&Move>) -> Option<Square> {
    let mv = last_move.filter(|mv| is_double_step(mv))?;
    Square::try_from_coords((mv.from.row() + mv.to.row()) / 2, mv.from.col()).ok()
}

/// Where the pawn of `us` on `from` may capture en passant, if anywhere.
pub fn capture_destination(
    board: &Board,
    from: Square,
    us: Color,
    last_move: Option<&Move>,
) -> Option<Square> {
    let mv = last_move?;
    if from.row() != fifth_row(us) || mv.piece.color == us || !is_double_step(mv) {
        return None;
    }

    if mv.to.row() != from.row() || (mv.to.col() as i8 - from.col() as i8).abs() != 1 {
        return None;
    }

    // The advanced pawn has to still be there.
    if board.piece_at(mv.to) != Some(mv.piece) {
        return None;
    }

    from.offset(us.pawn_step(), mv.to.col() as i8 - from.col() as i8)
}

/// The square holding the pawn captured by an en-passant move from `from` to `to`.
pub fn captured_square(from: Square, to: Square) -> Square {
    Square::of(from.row(), to.col())
}

/// Whether moving the pawn on `from` to `to` would be an en-passant capture: a pawn moving diagonally onto an empty
/// square.
pub fn is_en_passant(board: &Board, from: Square, to: Square) -> bool {
    let is_pawn = board
        .piece_at(from)
        .map_or(false, |p| p.kind == PieceKind::Pawn);
    is_pawn && from.col() != to.col() && board.is_empty_at(to)
}

/// Moves the capturing pawn and removes the pawn it captured. Returns the new board and the captured piece.
pub fn apply(board: &Board, from: Square, to: Square) -> (Board, Option<Piece>) {
    let victim = captured_square(from, to);
    let captured = board.piece_at(victim);
    (board.relocate(from, to).without_piece(victim), captured)
}

/// Reconstructs the double step implied by an en-passant target read from FEN, so that the capture it allows can be
/// generated without a real move history. `to_move` is the side that may capture.
pub fn implied_last_move(board: &Board, target: Square, to_move: Color) -> Option<Move> {
    let them = to_move.toggle();
    let from = target.offset(-them.pawn_step(), 0)?;
    let to = target.offset(them.pawn_step(), 0)?;
    let pawn = board.piece_at(to).filter(|p| p.is(PieceKind::Pawn, them))?;
    Some(Move {
        from,
        to,
        piece: pawn,
        captured: None,
        castle: None,
        promotion: None,
        flags: MoveFlags::DOUBLE_PAWN_PUSH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_move;
    use crate::core::*;
    use crate::fen;

    #[test]
    fn target_after_double_step() {
        let (_, mv) = apply_move(&Board::initial(), E2, E4, None, None).unwrap();
        assert_eq!(Some(E3), target_square(Some(&mv)));
        let (_, mv) = apply_move(&Board::initial(), G8, F6, None, None).unwrap();
        assert_eq!(None, target_square(Some(&mv)));
        assert_eq!(None, target_square(None));
    }

    #[test]
    fn capture_removes_passed_pawn() {
        let setup = fen::parse("4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1").unwrap();
        let (board, push) = apply_move(&setup.board, E2, E4, None, None).unwrap();
        assert_eq!(Some(E3), capture_destination(&board, F4, Color::Black, Some(&push)));

        let before = board.piece_count();
        let (after, mv) = apply_move(&board, F4, E3, Some(&push), None).unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(Some(Piece::new(PieceKind::Pawn, Color::White)), mv.captured);
        assert_eq!(before - 1, after.piece_count());
        assert!(after.is_empty_at(E4));
        assert!(after.piece_at(E3).unwrap().is(PieceKind::Pawn, Color::Black));
    }

    #[test]
    fn only_immediately_after_the_push() {
        let setup = fen::parse("4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1").unwrap();
        let (board, _) = apply_move(&setup.board, E2, E4, None, None).unwrap();
        let (board, king_move) = apply_move(&board, E8, D8, None, None).unwrap();
        assert_eq!(None, capture_destination(&board, F4, Color::Black, Some(&king_move)));
    }

    #[test]
    fn not_from_wrong_rank() {
        let setup = fen::parse("4k3/8/8/8/8/5p2/4P3/4K3 w - - 0 1").unwrap();
        let (board, push) = apply_move(&setup.board, E2, E4, None, None).unwrap();
        assert_eq!(None, capture_destination(&board, F3, Color::Black, Some(&push)));
    }

    #[test]
    fn not_when_pawn_not_adjacent() {
        let setup = fen::parse("4k3/8/8/8/6p1/8/4P3/4K3 w - - 0 1").unwrap();
        let (board, push) = apply_move(&setup.board, E2, E4, None, None).unwrap();
        assert_eq!(None, capture_destination(&board, G4, Color::Black, Some(&push)));
    }

    #[test]
    fn implied_move_from_fen_target() {
        let setup = fen::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = implied_last_move(&setup.board, D6, Color::White).unwrap();
        assert_eq!(D7, mv.from);
        assert_eq!(D5, mv.to);
        assert_eq!(Some(D6), capture_destination(&setup.board, E5, Color::White, Some(&mv)));
    }

    #[test]
    fn implied_move_needs_the_pawn() {
        let setup = fen::parse("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(None, implied_last_move(&setup.board, D6, Color::White));
    }
}
