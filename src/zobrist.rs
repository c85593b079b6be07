// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Zobrist keys for positions, used to bucket positions when counting repetitions.

use crate::board::Board;
use crate::core::{CastleSide, Color, Piece, Square};
use crate::special::castle;

struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub const fn new(seed: u64) -> Xorshift64 {
        Xorshift64 { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        self.state
    }
}

const SIDE_TO_MOVE_INDEX: usize = 768;
const CASTLING_RIGHTS_INDEX: usize = 769;
const EN_PASSANT_INDEX: usize = 773;
const TABLE_SIZE: usize = 781;

struct ZobristTable {
    magic_hashes: [u64; TABLE_SIZE],
}

impl ZobristTable {
    pub fn new(seed: u64) -> ZobristTable {
        let mut rng = Xorshift64::new(seed);
        let mut magic_hashes = [0; TABLE_SIZE];
        for entry in magic_hashes.iter_mut() {
            *entry = rng.next();
        }

        ZobristTable { magic_hashes }
    }

    fn piece_hash(&self, square: Square, piece: Piece) -> u64 {
        // Twelve entries per square: white pawn through white king, then black pawn through black king.
        let color_offset = if piece.color == Color::White { 0 } else { 6 };
        self.magic_hashes[12 * square.index() + color_offset + piece.kind as usize]
    }

    fn side_to_move_hash(&self, side: Color) -> u64 {
        match side {
            Color::White => 0,
            Color::Black => self.magic_hashes[SIDE_TO_MOVE_INDEX],
        }
    }

    fn castle_hash(&self, color: Color, side: CastleSide) -> u64 {
        let offset = match (color, side) {
            (Color::White, CastleSide::Kingside) => 0,
            (Color::White, CastleSide::Queenside) => 1,
            (Color::Black, CastleSide::Kingside) => 2,
            (Color::Black, CastleSide::Queenside) => 3,
        };

        self.magic_hashes[CASTLING_RIGHTS_INDEX + offset]
    }

    fn en_passant_hash(&self, square: Square) -> u64 {
        self.magic_hashes[EN_PASSANT_INDEX + square.col() as usize]
    }
}

const ZOBRIST_SEED: u64 = 0xf68e34a4e8ccf09a;

lazy_static::lazy_static! {
    static ref ZOBRIST_TABLE: ZobristTable = ZobristTable::new(ZOBRIST_SEED);
}

/// Hashes everything that makes two positions the same for repetition purposes: placement, castling availability,
/// the en-passant target and the side to move.
pub fn position_hash(board: &Board, en_passant: Option<Square>, to_move: Color) -> u64 {
    let table = &*ZOBRIST_TABLE;
    let mut hash = board
        .occupied()
        .fold(0, |acc, (sq, piece)| acc ^ table.piece_hash(sq, piece));

    for color in crate::core::colors() {
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if castle::has_rights(board, color, side) {
                hash ^= table.castle_hash(color, side);
            }
        }
    }

    if let Some(sq) = en_passant {
        hash ^= table.en_passant_hash(sq);
    }

    hash ^ table.side_to_move_hash(to_move)
}
