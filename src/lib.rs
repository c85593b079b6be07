// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `referee`, a rules engine for standard chess.
//!
//! `referee` knows which moves are legal, what a move does to the board, and when a game is over. It does not play:
//! there is no search and no evaluation. Everything here is a pure function over immutable [`Board`] values, with
//! [`Game`] bundling a board and its history into a document that an external store can persist.

pub mod apply;
pub mod attacks;
pub mod board;
pub mod core;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod outcome;
pub mod special;
mod zobrist;

pub use crate::board::Board;
pub use crate::error::RulesError;
pub use crate::game::{Game, GameError};
pub use crate::outcome::{Outcome, PositionSnapshot, Reason, Winner};
