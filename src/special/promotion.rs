// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pawn promotion. A pawn reaching the far rank becomes a queen, rook, bishop or knight; queen when nothing (or
//! nothing sensible) was asked for.

use crate::{
    core::{Color, Piece, PieceKind, Square},
    error::RulesError,
};

pub const DEFAULT_PROMOTION: PieceKind = PieceKind::Queen;

/// Whether a pawn of `color` arriving on `to` promotes.
pub fn is_promotion_square(to: Square, color: Color) -> bool {
    to.row() == color.promotion_row()
}

/// Strictly parses a promotion choice. Accepts a piece letter or name in any case.
pub fn parse_choice(choice: &str) -> Result<PieceKind, RulesError> {
    match choice.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Ok(PieceKind::Queen),
        "r" | "rook" => Ok(PieceKind::Rook),
        "b" | "bishop" => Ok(PieceKind::Bishop),
        "n" | "knight" => Ok(PieceKind::Knight),
        _ => Err(RulesError::InvalidPromotionChoice(choice.to_string())),
    }
}

/// Resolves a caller's promotion choice, falling back to a queen when there is none or it can't be parsed.
pub fn normalize_choice(choice: Option<&str>) -> PieceKind {
    match choice.map(parse_choice) {
        None => DEFAULT_PROMOTION,
        Some(Ok(kind)) => kind,
        Some(Err(err)) => {
            tracing::debug!("{}, promoting to {}", err, DEFAULT_PROMOTION);
            DEFAULT_PROMOTION
        }
    }
}

/// As [`normalize_choice`], for a choice that is already a piece kind. Pawns and kings fall back to a queen.
pub fn normalize_kind(choice: Option<PieceKind>) -> PieceKind {
    match choice {
        Some(kind) if kind.is_promotable() => kind,
        Some(kind) => {
            tracing::debug!("cannot promote to {:?}, promoting to {}", kind, DEFAULT_PROMOTION);
            DEFAULT_PROMOTION
        }
        None => DEFAULT_PROMOTION,
    }
}

/// The piece a pawn of `color` turns into. A promoted rook has already moved and can never castle.
pub fn promoted_piece(kind: PieceKind, color: Color) -> Piece {
    let piece = Piece::new(kind, color);
    if kind == PieceKind::Rook {
        piece.moved_now()
    } else {
        piece
    }
}
