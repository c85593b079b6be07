// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

use crate::core::{Color, Square};

/// Errors raised by the rules engine itself. None of them leave a board half-updated: boards are values, and a failed
/// operation simply produces no new board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },
    #[error("no {0} king on the board")]
    KingNotFound(Color),
    #[error("invalid promotion choice: {0:?}")]
    InvalidPromotionChoice(String),
}
