// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading and writing board setups in FEN.
//!
//! Only the first four FEN fields matter to the rules engine: placement, side to move, castling availability and the
//! en-passant target. Everything after the placement is optional; the clock fields are accepted and ignored since the
//! fifty-move rule is decided from move history, not from a counter.
//!
//! Castling availability maps onto the "has moved" flags that kings and rooks carry. With no castling field, a king or
//! rook standing on its home square is taken to be unmoved.

use std::{convert::TryFrom, fmt::Write};

use thiserror::Error;

use crate::{
    board::Board,
    core::{self, CastleSide, Color, Piece, PieceKind, Square},
    special::castle,
};

/// Possible errors that can arise when parsing a FEN string.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("row does not sum to 8")]
    RowDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
}

/// A board together with the state FEN carries alongside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setup {
    pub board: Board,
    pub to_move: Color,
    pub en_passant: Option<Square>,
}

impl Setup {
    pub fn initial() -> Setup {
        Setup {
            board: Board::initial(),
            to_move: Color::White,
            en_passant: None,
        }
    }

    /// Prints the first four FEN fields for this setup.
    pub fn to_fen(&self) -> String {
        let mut buf = placement(&self.board);
        buf.push(' ');
        match self.to_move {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }

        buf.push(' ');
        let mut any_rights = false;
        for (color, side, c) in [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ] {
            if castle::has_rights(&self.board, color, side) {
                buf.push(c);
                any_rights = true;
            }
        }

        if !any_rights {
            buf.push('-');
        }

        buf.push(' ');
        match self.en_passant {
            Some(sq) => write!(&mut buf, "{}", sq).unwrap(),
            None => buf.push('-'),
        }

        buf
    }
}

/// Parses a FEN string into a [`Setup`].
pub fn parse(fen: impl AsRef<str>) -> Result<Setup, FenParseError> {
    use std::{iter::Peekable, str::Chars};

    type Stream<'a> = Peekable<Chars<'a>>;

    fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
        match iter.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(FenParseError::UnexpectedChar(c)),
            None => Err(FenParseError::UnexpectedEnd),
        }
    }

    fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
        iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
    }

    /// Consumes a field separator. Returns false at the end of input, where every remaining field takes its default.
    fn next_field(iter: &mut Stream<'_>) -> Result<bool, FenParseError> {
        if iter.peek().is_none() {
            return Ok(false);
        }

        eat(iter, ' ')?;
        Ok(true)
    }

    fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
        let side = match peek(iter)? {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };

        iter.next();
        Ok(side)
    }

    fn eat_castle_status(
        iter: &mut Stream<'_>,
    ) -> Result<Vec<(Color, CastleSide)>, FenParseError> {
        if peek(iter)? == '-' {
            iter.next();
            return Ok(vec![]);
        }

        let mut rights = vec![];
        while let Some(&c) = iter.peek() {
            let right = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                ' ' => break,
                _ => return Err(FenParseError::InvalidCastle),
            };

            if rights.contains(&right) {
                return Err(FenParseError::InvalidCastle);
            }

            rights.push(right);
            iter.next();
        }

        if rights.is_empty() {
            return Err(FenParseError::InvalidCastle);
        }

        Ok(rights)
    }

    fn eat_en_passant(iter: &mut Stream<'_>) -> Result<Option<Square>, FenParseError> {
        if peek(iter)? == '-' {
            iter.next();
            return Ok(None);
        }

        let mut label = String::new();
        for _ in 0..2 {
            match iter.next() {
                Some(c) => label.push(c),
                None => return Err(FenParseError::InvalidEnPassant),
            }
        }

        let sq: Square = label
            .parse()
            .map_err(|_| FenParseError::InvalidEnPassant)?;
        // The target always sits behind a pawn that just double-stepped: rank 3 or rank 6.
        if sq.row() != 2 && sq.row() != 5 {
            return Err(FenParseError::InvalidEnPassant);
        }

        Ok(Some(sq))
    }

    let iter = &mut fen.as_ref().chars().peekable();
    let mut board = Board::empty();
    for row in 0..8u8 {
        let mut col = 0u8;
        while col <= 7 {
            let c = peek(iter)?;
            // digits 1 through 8 indicate empty squares.
            if let Some(value) = c.to_digit(10) {
                if !(1..=8).contains(&value) {
                    return Err(FenParseError::InvalidDigit);
                }

                col += value as u8;
                if col > 8 {
                    return Err(FenParseError::RowDoesNotSumToEight);
                }

                iter.next();
                continue;
            }

            // if it's not a digit, it represents a piece.
            let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
            board = board.with_piece(Square::of(row, col), Some(piece));
            iter.next();
            col += 1;
        }

        if row != 7 {
            eat(iter, '/')?;
        }
    }

    let mut setup = Setup {
        board,
        to_move: Color::White,
        en_passant: None,
    };

    let mut castle_rights = None;
    if next_field(iter)? {
        setup.to_move = eat_side_to_move(iter)?;
        if next_field(iter)? {
            castle_rights = Some(eat_castle_status(iter)?);
            if next_field(iter)? {
                setup.en_passant = eat_en_passant(iter)?;
            }
        }
    }

    setup.board = match castle_rights {
        Some(rights) => apply_castle_rights(&setup.board, &rights)?,
        None => infer_castle_rights(&setup.board),
    };

    Ok(setup)
}

/// Prints the placement field of a board.
pub fn placement(board: &Board) -> String {
    let mut buf = String::new();
    for row in 0..8 {
        let mut empty_squares = 0;
        for col in 0..8 {
            if let Some(piece) = board.piece_at(Square::of(row, col)) {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                }

                write!(&mut buf, "{}", piece).unwrap();
                empty_squares = 0;
            } else {
                empty_squares += 1;
            }
        }

        if empty_squares != 0 {
            write!(&mut buf, "{}", empty_squares).unwrap();
        }

        if row != 7 {
            buf.push('/');
        }
    }

    buf
}

fn home_king(color: Color) -> Square {
    Square::of(color.home_row(), 4)
}

fn home_rook(color: Color, side: CastleSide) -> Square {
    Square::of(color.home_row(), side.rook_col())
}

fn mark_all_moved(board: &Board) -> Board {
    board
        .occupied()
        .filter(|(_, piece)| piece.kind.tracks_moved())
        .fold(board.clone(), |acc, (sq, piece)| {
            acc.with_piece(sq, Some(piece.moved_now()))
        })
}

fn apply_castle_rights(
    board: &Board,
    rights: &[(Color, CastleSide)],
) -> Result<Board, FenParseError> {
    let mut board = mark_all_moved(board);
    for &(color, side) in rights {
        for (sq, kind) in [
            (home_king(color), PieceKind::King),
            (home_rook(color, side), PieceKind::Rook),
        ] {
            match board.piece_at(sq) {
                Some(piece) if piece.is(kind, color) => {
                    board = board.with_piece(sq, Some(Piece::new(kind, color)));
                }
                _ => return Err(FenParseError::InvalidCastle),
            }
        }
    }

    Ok(board)
}

fn infer_castle_rights(board: &Board) -> Board {
    let mut board = mark_all_moved(board);
    for color in core::colors() {
        let mut homes = vec![(home_king(color), PieceKind::King)];
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            homes.push((home_rook(color, side), PieceKind::Rook));
        }

        for (sq, kind) in homes {
            if board.piece_at(sq).map_or(false, |p| p.is(kind, color)) {
                board = board.with_piece(sq, Some(Piece::new(kind, color)));
            }
        }
    }

    board
}
