// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game document: everything a store needs to persist to resume a game, plus the turn logic that keeps it
//! consistent.
//!
//! [`Game`] is plain data. Whoever owns it is responsible for serializing writes; in particular a caller that loses a
//! write race must reload the game and call [`Game::play`] again rather than replaying a move computed against the
//! stale copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    apply,
    attacks,
    board::Board,
    core::{Color, Move, MoveRequest, Square, SquareSet},
    error::RulesError,
    fen::Setup,
    notation,
    outcome::{self, Outcome, PositionSnapshot, Reason},
    special::en_passant,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("the game is already over: {0}")]
    GameOver(Outcome),
    #[error("it is {0}'s turn")]
    NotYourTurn(Color),
    #[error("{0} has no draw offer to answer")]
    NoDrawOffer(Color),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    moves: Vec<Move>,
    notation: Vec<String>,
    positions: Vec<PositionSnapshot>,
    last_move: Option<Move>,
    draw_offer: Option<Color>,
    outcome: Option<Outcome>,
}

impl Game {
    /// A game from the standard starting position, white to move.
    pub fn new() -> Game {
        Game::from_setup(Setup::initial())
    }

    /// A game starting from an arbitrary setup. An en-passant target in the setup is turned into the double step
    /// that would have produced it, so the capture stays available on the first move.
    pub fn from_setup(setup: Setup) -> Game {
        let last_move = setup
            .en_passant
            .and_then(|target| en_passant::implied_last_move(&setup.board, target, setup.to_move));
        Game {
            board: setup.board,
            turn: setup.to_move,
            moves: vec![],
            notation: vec![],
            positions: vec![],
            last_move,
            draw_offer: None,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn notation(&self) -> &[String] {
        &self.notation
    }

    pub fn positions(&self) -> &[PositionSnapshot] {
        &self.positions
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn draw_offer(&self) -> Option<Color> {
        self.draw_offer
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Legal destinations for the piece on `from`. Empty when the square is empty, holds a piece of the side not to
    /// move, or the game is over.
    pub fn legal_destinations(&self, from: Square) -> SquareSet {
        match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn && !self.is_over() => {
                attacks::legal_destinations(&self.board, from, piece, self.last_move.as_ref())
            }
            _ => SquareSet::empty(),
        }
    }

    /// Plays a move for the side to move and returns the record of it.
    pub fn play(&mut self, request: MoveRequest) -> Result<&Move, GameError> {
        self.ensure_not_over()?;
        let MoveRequest { from, to, promotion } = request;
        let piece = self
            .board
            .piece_at(from)
            .ok_or(RulesError::IllegalMove { from, to })?;
        if piece.color != self.turn {
            return Err(GameError::NotYourTurn(self.turn));
        }

        let last_move = self.last_move.as_ref();
        if !attacks::legal_destinations(&self.board, from, piece, last_move).contains(to) {
            return Err(RulesError::IllegalMove { from, to }.into());
        }

        let (board, mov) = apply::apply_move(&self.board, from, to, last_move, promotion)?;
        let san = notation::san(&self.board, &mov, last_move);
        tracing::info!(mov = %mov, san = %san, color = %self.turn, "move played");

        self.positions.push(PositionSnapshot::after(&board, &mov));
        self.moves.push(mov);
        self.notation.push(san);
        self.board = board;
        self.turn = self.turn.toggle();
        self.draw_offer = None;
        self.outcome = outcome::evaluate_outcome(
            &self.board,
            self.turn,
            Some(&mov),
            &self.moves,
            &self.positions,
        );
        if let Some(outcome) = self.outcome {
            tracing::info!(%outcome, "game over");
        }

        Ok(&*self.last_move.insert(mov))
    }

    /// Records a draw offer from `color`, replacing any earlier one.
    pub fn offer_draw(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_not_over()?;
        tracing::info!(%color, "draw offered");
        self.draw_offer = Some(color);
        Ok(())
    }

    /// Accepts the opponent's pending draw offer, ending the game.
    pub fn accept_draw(&mut self, color: Color) -> Result<Outcome, GameError> {
        self.ensure_not_over()?;
        self.take_offer_to(color)?;
        Ok(self.finish(Outcome::draw(Reason::Agreement)))
    }

    /// Declines the opponent's pending draw offer.
    pub fn decline_draw(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_not_over()?;
        self.take_offer_to(color)?;
        tracing::info!(%color, "draw declined");
        Ok(())
    }

    pub fn resign(&mut self, color: Color) -> Result<Outcome, GameError> {
        self.ensure_not_over()?;
        Ok(self.finish(Outcome::win(color.toggle(), Reason::Resignation)))
    }

    fn ensure_not_over(&self) -> Result<(), GameError> {
        match self.outcome {
            Some(outcome) => Err(GameError::GameOver(outcome)),
            None => Ok(()),
        }
    }

    /// Clears a pending offer made to `color` by its opponent.
    fn take_offer_to(&mut self, color: Color) -> Result<(), GameError> {
        match self.draw_offer {
            Some(offerer) if offerer != color => {
                self.draw_offer = None;
                Ok(())
            }
            _ => Err(GameError::NoDrawOffer(color)),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        tracing::info!(%outcome, "game over");
        self.draw_offer = None;
        self.outcome = Some(outcome);
        outcome
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
