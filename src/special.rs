// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Module `special` holds the rules for the three moves that do more than relocate a single piece: castling, en
//! passant and promotion.

pub mod castle;
pub mod en_passant;
pub mod promotion;
