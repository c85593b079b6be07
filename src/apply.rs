// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The move applicator: turns a (from, to) request into a new board and a [`Move`] record.

use crate::{
    attacks,
    board::Board,
    core::{Move, MoveFlags, PieceKind, Square},
    error::RulesError,
    special::{castle, en_passant, promotion},
};

/// Applies the move from `from` to `to` and returns the resulting board together with a record of what happened.
///
/// The move is classified, in order, as castling (a king moving exactly two files), en passant (a pawn capturing
/// towards the square an enemy pawn passed over with `last_move`) or an ordinary move, which promotes when a pawn
/// reaches its last rank. Legality is not checked here; callers are expected to have picked `to` from
/// [`attacks::legal_destinations`].
///
/// Fails with [`RulesError::IllegalMove`] when `from` is empty.
pub fn apply_move(
    board: &Board,
    from: Square,
    to: Square,
    last_move: Option<&Move>,
    promotion: Option<PieceKind>,
) -> Result<(Board, Move), RulesError> {
    let piece = board
        .piece_at(from)
        .ok_or(RulesError::IllegalMove { from, to })?;
    let mut mov = Move {
        from,
        to,
        piece,
        captured: None,
        castle: None,
        promotion: None,
        flags: MoveFlags::empty(),
    };

    let castle_side = if piece.kind == PieceKind::King {
        castle::side_for(from, to)
    } else {
        None
    };

    let next = if let Some(side) = castle_side {
        mov.castle = Some(side);
        mov.flags |= MoveFlags::CASTLE;
        castle::apply(board, from, side)?
    } else if piece.kind == PieceKind::Pawn
        && en_passant::capture_destination(board, from, piece.color, last_move) == Some(to)
    {
        let (next, captured) = en_passant::apply(board, from, to);
        mov.captured = captured;
        mov.flags |= MoveFlags::EN_PASSANT;
        if captured.is_some() {
            mov.flags |= MoveFlags::CAPTURE;
        }

        next
    } else {
        mov.captured = board.piece_at(to);
        if mov.captured.is_some() {
            mov.flags |= MoveFlags::CAPTURE;
        }

        let mut next = board.relocate(from, to);
        if piece.kind == PieceKind::Pawn {
            if (from.row() as i8 - to.row() as i8).abs() == 2 {
                mov.flags |= MoveFlags::DOUBLE_PAWN_PUSH;
            }

            if promotion::is_promotion_square(to, piece.color) {
                let kind = promotion::normalize_kind(promotion);
                mov.promotion = Some(kind);
                mov.flags |= MoveFlags::PROMOTION;
                next = next.with_piece(to, Some(promotion::promoted_piece(kind, piece.color)));
            }
        }

        next
    };

    let them = piece.color.toggle();
    if attacks::is_in_check(&next, them) {
        mov.flags |= MoveFlags::CHECK;
        if !attacks::has_legal_moves(&next, them, Some(&mov)) {
            mov.flags |= MoveFlags::CHECKMATE;
        }
    }

    tracing::debug!(
        mov = %mov,
        piece = %mov.piece,
        flags = ?mov.flags,
        "applied move"
    );
    Ok((next, mov))
}
