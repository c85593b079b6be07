// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deciding whether a game is over, and how.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    attacks,
    board::Board,
    core::{CastleSide, Color, Move, PieceKind, Square},
    special::{castle, en_passant},
    zobrist,
};

/// Number of trailing plies without a pawn move or capture that ends the game.
pub const FIFTY_MOVE_PLIES: usize = 100;

/// Number of occurrences of one position that ends the game.
pub const REPETITION_LIMIT: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    #[display(fmt = "white")]
    White,
    #[display(fmt = "black")]
    Black,
    #[display(fmt = "draw")]
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Winner {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    #[display(fmt = "checkmate")]
    Checkmate,
    #[display(fmt = "stalemate")]
    Stalemate,
    #[display(fmt = "insufficient material")]
    InsufficientMaterial,
    #[display(fmt = "fifty-move rule")]
    FiftyMoveRule,
    #[display(fmt = "threefold repetition")]
    ThreefoldRepetition,
    #[display(fmt = "resignation")]
    Resignation,
    #[display(fmt = "agreement")]
    Agreement,
}

/// A finished game's result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display(fmt = "{} ({})", winner, reason)]
pub struct Outcome {
    pub winner: Winner,
    pub reason: Reason,
}

impl Outcome {
    pub fn win(color: Color, reason: Reason) -> Outcome {
        Outcome {
            winner: color.into(),
            reason,
        }
    }

    pub fn draw(reason: Reason) -> Outcome {
        Outcome {
            winner: Winner::Draw,
            reason,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner == Winner::Draw
    }
}

/// Zobrist key of a [`PositionSnapshot`]. Equal snapshots have equal keys; the converse is only very likely.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey(pub u64);

/// One entry of the position history: the board after a move, the en-passant target that move created and the
/// color to move next.
///
/// Two snapshots are the same position when they agree on piece placement, castling availability, the en-passant
/// target and the color to move. A rook or king that wandered off and came back has lost its castling right, so it
/// only changes the position while that right would otherwise still stand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub board: Board,
    pub en_passant: Option<Square>,
    pub to_move: Color,
}

impl PositionSnapshot {
    /// The snapshot recorded after `mov` produced `board`.
    pub fn after(board: &Board, mov: &Move) -> PositionSnapshot {
        PositionSnapshot {
            board: board.clone(),
            en_passant: en_passant::target_square(Some(mov)),
            to_move: mov.piece.color.toggle(),
        }
    }

    pub fn key(&self) -> PositionKey {
        PositionKey(zobrist::position_hash(
            &self.board,
            self.en_passant,
            self.to_move,
        ))
    }
}

type Placement = [Option<(PieceKind, Color)>; 64];

impl PositionSnapshot {
    fn placement(&self) -> Placement {
        let mut placement = [None; 64];
        for (sq, piece) in self.board.occupied() {
            placement[sq.index()] = Some((piece.kind, piece.color));
        }

        placement
    }

    fn castling_rights(&self) -> [bool; 4] {
        [
            castle::has_rights(&self.board, Color::White, CastleSide::Kingside),
            castle::has_rights(&self.board, Color::White, CastleSide::Queenside),
            castle::has_rights(&self.board, Color::Black, CastleSide::Kingside),
            castle::has_rights(&self.board, Color::Black, CastleSide::Queenside),
        ]
    }
}

impl PartialEq for PositionSnapshot {
    fn eq(&self, other: &PositionSnapshot) -> bool {
        self.to_move == other.to_move
            && self.en_passant == other.en_passant
            && self.placement() == other.placement()
            && self.castling_rights() == other.castling_rights()
    }
}

impl Eq for PositionSnapshot {}

impl Hash for PositionSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Decides whether the game is over after a move, with `to_move` next to play.
///
/// The checks run in a fixed order and the first one that applies wins: no legal moves (checkmate when in check,
/// otherwise stalemate), insufficient material, the fifty-move rule, then threefold repetition. `None` means the game
/// continues.
pub fn evaluate_outcome(
    board: &Board,
    to_move: Color,
    last_move: Option<&Move>,
    moves: &[Move],
    positions: &[PositionSnapshot],
) -> Option<Outcome> {
    if !attacks::has_legal_moves(board, to_move, last_move) {
        return if attacks::is_in_check(board, to_move) {
            Some(Outcome::win(to_move.toggle(), Reason::Checkmate))
        } else {
            Some(Outcome::draw(Reason::Stalemate))
        };
    }

    if is_insufficient_material(board) {
        return Some(Outcome::draw(Reason::InsufficientMaterial));
    }

    if reversible_plies(moves) >= FIFTY_MOVE_PLIES {
        return Some(Outcome::draw(Reason::FiftyMoveRule));
    }

    if most_repetitions(positions) >= REPETITION_LIMIT {
        return Some(Outcome::draw(Reason::ThreefoldRepetition));
    }

    None
}

/// King against king, king and one minor piece against king, or king and bishop against king and bishop with both
/// bishops on squares of the same color.
pub fn is_insufficient_material(board: &Board) -> bool {
    let others: Vec<_> = board
        .occupied()
        .filter(|(_, piece)| piece.kind != PieceKind::King)
        .collect();

    match others.as_slice() {
        [] => true,
        [(_, piece)] => piece.kind.is_minor(),
        [(sq_a, a), (sq_b, b)] => {
            a.kind == PieceKind::Bishop
                && b.kind == PieceKind::Bishop
                && a.color != b.color
                && sq_a.parity() == sq_b.parity()
        }
        _ => false,
    }
}

/// Number of trailing plies with neither a pawn move nor a capture.
pub fn reversible_plies(moves: &[Move]) -> usize {
    moves
        .iter()
        .rev()
        .take_while(|mov| !mov.is_irreversible())
        .count()
}

/// How many times the most frequent position in `positions` occurs.
pub fn most_repetitions(positions: &[PositionSnapshot]) -> usize {
    let mut counts: HashMap<&PositionSnapshot, usize> = HashMap::new();
    for snapshot in positions {
        *counts.entry(snapshot).or_default() += 1;
    }

    counts.values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply_move;
    use crate::core::*;
    use crate::fen;

    struct Line {
        board: Board,
        moves: Vec<Move>,
        positions: Vec<PositionSnapshot>,
    }

    impl Line {
        fn new(board: Board) -> Line {
            Line {
                board,
                moves: vec![],
                positions: vec![],
            }
        }

        fn play(&mut self, from: Square, to: Square) -> Option<Outcome> {
            let (board, mov) = apply_move(&self.board, from, to, self.moves.last(), None).unwrap();
            self.positions.push(PositionSnapshot::after(&board, &mov));
            self.moves.push(mov);
            self.board = board;
            evaluate_outcome(
                &self.board,
                mov.piece.color.toggle(),
                Some(&mov),
                &self.moves,
                &self.positions,
            )
        }
    }

    fn outcome_of(fen: &'static str) -> Option<Outcome> {
        let setup = fen::parse(fen).unwrap();
        evaluate_outcome(&setup.board, setup.to_move, None, &[], &[])
    }

    #[test]
    fn scholars_mate() {
        let mut line = Line::new(Board::initial());
        for &(from, to) in &[(E2, E4), (E7, E5), (D1, H5), (B8, C6), (F1, C4), (G8, F6)] {
            assert_eq!(None, line.play(from, to));
        }

        let outcome = line.play(H5, F7);
        assert_eq!(Some(Outcome::win(Color::White, Reason::Checkmate)), outcome);
        assert!(!attacks::has_legal_moves(&line.board, Color::Black, line.moves.last()));
        assert!(line.moves.last().unwrap().is_checkmate());
    }

    #[test]
    fn stalemate() {
        let fen = "k7/1R6/2K5/8/8/8/8/8 b - - 0 1";
        assert_eq!(Some(Outcome::draw(Reason::Stalemate)), outcome_of(fen));
        let setup = fen::parse(fen).unwrap();
        assert!(!attacks::is_in_check(&setup.board, Color::Black));
    }

    #[test]
    fn insufficient_material() {
        let draw = Some(Outcome::draw(Reason::InsufficientMaterial));
        assert_eq!(draw, outcome_of("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert_eq!(draw, outcome_of("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        assert_eq!(draw, outcome_of("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1"));
        assert_eq!(None, outcome_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert_eq!(None, outcome_of("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
    }

    #[test]
    fn bishops_on_same_color() {
        // c1 and f8 are both dark squares.
        let draw = Some(Outcome::draw(Reason::InsufficientMaterial));
        assert_eq!(draw, outcome_of("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        // c1 and c8 are not.
        assert_eq!(None, outcome_of("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
    }

    #[test]
    fn two_knights_can_still_play() {
        assert_eq!(None, outcome_of("4k3/8/8/8/8/8/8/1N2K1N1 w - - 0 1"));
    }

    #[test]
    fn threefold_on_third_occurrence() {
        let mut line = Line::new(Board::initial());
        let shuffle = [(G1, F3), (G8, F6), (F3, G1), (F6, G8)];
        for &(from, to) in shuffle.iter().chain(shuffle.iter()) {
            assert_eq!(None, line.play(from, to));
        }

        assert_eq!(2, most_repetitions(&line.positions));
        assert_eq!(
            Some(Outcome::draw(Reason::ThreefoldRepetition)),
            line.play(G1, F3)
        );
    }

    #[test]
    fn threefold_ignores_moved_flags_without_castling_rights() {
        let mut line = Line::new(Board::initial());
        // The kings step out and back, which costs both sides every castling right.
        for &(from, to) in &[(E2, E4), (E7, E5), (E1, E2), (E8, E7), (E2, E1), (E7, E8)] {
            assert_eq!(None, line.play(from, to));
        }

        let first = line.positions.last().unwrap().clone();

        // The kingside rooks make the same trip, so their moved flags no longer match the first occurrence.
        let detour = [
            (G1, F3),
            (G8, F6),
            (H1, G1),
            (H8, G8),
            (G1, H1),
            (G8, H8),
            (F3, G1),
            (F6, G8),
        ];
        for &(from, to) in &detour {
            assert_eq!(None, line.play(from, to));
        }

        let second = line.positions.last().unwrap().clone();
        assert_ne!(first.board, second.board);
        assert_eq!(first, second);
        assert_eq!(first.key(), second.key());
        assert_eq!(2, most_repetitions(&line.positions));

        for &(from, to) in &[(G1, F3), (G8, F6), (F3, G1)] {
            assert_eq!(None, line.play(from, to));
        }

        assert_eq!(
            Some(Outcome::draw(Reason::ThreefoldRepetition)),
            line.play(F6, G8)
        );
    }

    #[test]
    fn lost_castling_right_separates_positions() {
        let board = Board::initial();
        let before = PositionSnapshot {
            board: board.clone(),
            en_passant: None,
            to_move: Color::White,
        };
        let after = PositionSnapshot {
            board: board.relocate(H1, H1),
            ..before.clone()
        };
        assert_ne!(before, after);
    }

    #[test]
    fn side_to_move_separates_positions() {
        let board = Board::initial();
        let white = PositionSnapshot {
            board: board.clone(),
            en_passant: None,
            to_move: Color::White,
        };
        let black = PositionSnapshot {
            to_move: Color::Black,
            ..white.clone()
        };
        assert_ne!(white.key(), black.key());
        let positions = vec![white.clone(), black, white];
        assert_eq!(2, most_repetitions(&positions));
    }

    #[test]
    fn fifty_move_rule() {
        let setup = fen::parse("r3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let (_, quiet) = apply_move(&setup.board, A1, A2, None, None).unwrap();
        let (_, push) = apply_move(&Board::initial(), E2, E4, None, None).unwrap();

        let mut moves = vec![push];
        moves.extend(std::iter::repeat(quiet).take(FIFTY_MOVE_PLIES - 1));
        assert_eq!(
            None,
            evaluate_outcome(&setup.board, Color::White, None, &moves, &[])
        );

        moves.push(quiet);
        assert_eq!(
            Some(Outcome::draw(Reason::FiftyMoveRule)),
            evaluate_outcome(&setup.board, Color::White, None, &moves, &[])
        );
        assert_eq!(FIFTY_MOVE_PLIES, reversible_plies(&moves));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            "white (checkmate)",
            Outcome::win(Color::White, Reason::Checkmate).to_string()
        );
        assert_eq!(
            "draw (insufficient material)",
            Outcome::draw(Reason::InsufficientMaterial).to_string()
        );
    }
}
