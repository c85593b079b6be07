// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random legal games, checking that the board stays sane the whole way through.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use referee::attacks;
use referee::core::{self, MoveRequest, PieceKind};
use referee::Game;

const MAX_PLIES: usize = 400;

fn kings(game: &Game) -> usize {
    game.board()
        .occupied()
        .filter(|(_, piece)| piece.kind == PieceKind::King)
        .count()
}

fn random_game(seed: u64) -> Game {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = Game::new();
    while !game.is_over() && game.moves().len() < MAX_PLIES {
        let mover = game.turn();
        let choices = attacks::legal_moves(game.board(), mover, game.last_move());
        let &(from, to) = choices
            .choose(&mut rng)
            .expect("a game that is not over has a legal move");
        let kinds = [
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ];
        let request = MoveRequest {
            from,
            to,
            promotion: Some(kinds[rng.gen_range(0..kinds.len())]),
        };

        let before = game.board().piece_count();
        game.play(request).unwrap();
        let after = game.board().piece_count();
        assert!(before - after <= 1, "ply removed more than one piece");
        assert!(!attacks::is_in_check(game.board(), mover), "mover left in check");
        assert_eq!(2, kings(&game));
        for color in core::colors() {
            assert!(game.board().king_square(color).is_ok());
        }
    }

    game
}

#[test]
fn random_playouts_stay_legal() {
    for seed in 0..8 {
        let game = random_game(seed);
        assert_eq!(game.moves().len(), game.positions().len());
        assert_eq!(game.moves().len(), game.notation().len());
    }
}

#[test]
fn finished_games_reject_moves() {
    for seed in 100..104 {
        let mut game = random_game(seed);
        if !game.is_over() {
            continue;
        }

        for color in core::colors() {
            for (sq, _) in game.board().pieces(color).collect::<Vec<_>>() {
                assert!(game.legal_destinations(sq).is_empty());
            }
        }

        assert!(game.resign(game.turn()).is_err());
    }
}
