// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Standard algebraic notation for applied moves. Output only; nothing here parses SAN.

use std::fmt::Write;

use crate::{
    attacks,
    board::Board,
    core::{CastleSide, Move, PieceKind},
};

/// Renders `mov`, which was played on `before` right after `last_move_before`, in standard algebraic notation.
pub fn san(before: &Board, mov: &Move, last_move_before: Option<&Move>) -> String {
    let mut buf = String::new();
    match mov.castle {
        Some(CastleSide::Kingside) => buf.push_str("O-O"),
        Some(CastleSide::Queenside) => buf.push_str("O-O-O"),
        None if mov.piece.kind == PieceKind::Pawn => {
            if mov.is_capture() {
                write!(&mut buf, "{}x", mov.from.file_char()).unwrap();
            }

            write!(&mut buf, "{}", mov.to).unwrap();
            if let Some(kind) = mov.promotion {
                write!(&mut buf, "={}", kind.letter()).unwrap();
            }
        }
        None => {
            buf.push(mov.piece.kind.letter());
            buf.push_str(&disambiguation(before, mov, last_move_before));
            if mov.is_capture() {
                buf.push('x');
            }

            write!(&mut buf, "{}", mov.to).unwrap();
        }
    }

    if mov.is_checkmate() {
        buf.push('#');
    } else if mov.is_check() {
        buf.push('+');
    }

    buf
}

/// The file, rank or both of the source square, as needed to tell `mov` apart from moves of other same-kind pieces
/// that could legally reach the same square.
fn disambiguation(before: &Board, mov: &Move, last_move: Option<&Move>) -> String {
    let rivals: Vec<_> = before
        .pieces(mov.piece.color)
        .filter(|&(sq, piece)| sq != mov.from && piece.kind == mov.piece.kind)
        .filter(|&(sq, piece)| attacks::legal_destinations(before, sq, piece, last_move).contains(mov.to))
        .map(|(sq, _)| sq)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    if rivals.iter().all(|sq| sq.col() != mov.from.col()) {
        mov.from.file_char().to_string()
    } else if rivals.iter().all(|sq| sq.row() != mov.from.row()) {
        mov.from.rank_char().to_string()
    } else {
        mov.from.to_string()
    }
}
