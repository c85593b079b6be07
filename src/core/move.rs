// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::core::{Piece, PieceKind, Square};
use crate::special::promotion;

bitflags! {
    /// Everything notable about a move that has been applied to a board.
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b0000_0001;
        const DOUBLE_PAWN_PUSH = 0b0000_0010;
        const CASTLE = 0b0000_0100;
        const EN_PASSANT = 0b0000_1000;
        const PROMOTION = 0b0001_0000;
        const CHECK = 0b0010_0000;
        const CHECKMATE = 0b0100_0000;
    }
}

impl Serialize for MoveFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for MoveFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        MoveFlags::from_bits(bits)
            .ok_or_else(|| de::Error::custom(format!("invalid move flags: {:#x}", bits)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Column of the rook that castles on this side.
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column delta of one king step towards this side's rook.
    pub const fn step(self) -> i8 {
        match self {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        }
    }
}

/// A move that has been applied to a board, as recorded by [`crate::apply::apply_move`].
///
/// A `Move` is a record of what happened and is never constructed by hand outside of the applicator. Callers
/// describe the move they want with a [`MoveRequest`] instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood on `from` before moving.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    pub fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    pub fn is_check(&self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    pub fn is_checkmate(&self) -> bool {
        self.flags.contains(MoveFlags::CHECKMATE)
    }

    /// Whether this move resets the fifty-move count: any pawn move or any capture.
    pub fn is_irreversible(&self) -> bool {
        self.piece.kind == PieceKind::Pawn || self.is_capture()
    }

    /// Coordinate notation for this move, e.g. `e2e4` or `e7e8q`.
    pub fn as_coordinate(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_coordinate())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveRequestParseError {
    #[error("move too short: {0:?}")]
    TooShort(String),
    #[error("move too long: {0:?}")]
    TooLong(String),
    #[error("invalid square in move {0:?}")]
    InvalidSquare(String),
}

/// A move a player asks for: a source, a destination and an optional promotion choice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    #[serde(default, deserialize_with = "deserialize_promotion")]
    pub promotion: Option<PieceKind>,
}

/// Stored promotion choices go through the same queen fallback as parsed ones.
fn deserialize_promotion<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PieceKind>, D::Error> {
    let choice = Option::<String>::deserialize(deserializer)?;
    Ok(choice.map(|choice| promotion::normalize_choice(Some(&choice))))
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> MoveRequest {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(from: Square, to: Square, kind: PieceKind) -> MoveRequest {
        MoveRequest {
            from,
            to,
            promotion: Some(kind),
        }
    }
}

impl FromStr for MoveRequest {
    type Err = MoveRequestParseError;

    /// Parses coordinate notation: a source square, a destination square and optionally a promotion letter.
    /// An unrecognized promotion letter is not an error; it falls back to a queen like every other promotion
    /// choice does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(2) || !s.is_char_boundary(4) {
            return Err(MoveRequestParseError::TooShort(s.to_string()));
        }

        if s.chars().count() > 5 {
            return Err(MoveRequestParseError::TooLong(s.to_string()));
        }

        let from = s[0..2]
            .parse()
            .map_err(|_| MoveRequestParseError::InvalidSquare(s.to_string()))?;
        let to = s[2..4]
            .parse()
            .map_err(|_| MoveRequestParseError::InvalidSquare(s.to_string()))?;
        let promotion = match &s[4..] {
            "" => None,
            choice => Some(promotion::normalize_choice(Some(choice))),
        };

        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;

    #[test]
    fn request_smoke() {
        let req: MoveRequest = "e2e4".parse().unwrap();
        assert_eq!(MoveRequest::new(E2, E4), req);
        assert_eq!("e2e4", req.to_string());
    }

    #[test]
    fn request_promote() {
        let req: MoveRequest = "a7a8n".parse().unwrap();
        assert_eq!(MoveRequest::promoting(A7, A8, PieceKind::Knight), req);
    }

    #[test]
    fn request_bad_promotion_letter_is_queen() {
        let req: MoveRequest = "a7a8x".parse().unwrap();
        assert_eq!(Some(PieceKind::Queen), req.promotion);
    }

    #[test]
    fn request_errors() {
        assert!(matches!(
            "e2".parse::<MoveRequest>(),
            Err(MoveRequestParseError::TooShort(_))
        ));
        assert!(matches!(
            "e2e4qq".parse::<MoveRequest>(),
            Err(MoveRequestParseError::TooLong(_))
        ));
        assert!(matches!(
            "z2e4".parse::<MoveRequest>(),
            Err(MoveRequestParseError::InvalidSquare(_))
        ));
    }

    #[test]
    fn request_json_falls_back_to_queen() {
        let req: MoveRequest =
            serde_json::from_str(r#"{"from": "a7", "to": "a8", "promotion": "dragon"}"#).unwrap();
        assert_eq!(MoveRequest::promoting(A7, A8, PieceKind::Queen), req);

        let req: MoveRequest =
            serde_json::from_str(r#"{"from": "a7", "to": "a8", "promotion": "knight"}"#).unwrap();
        assert_eq!(Some(PieceKind::Knight), req.promotion);

        let req: MoveRequest = serde_json::from_str(r#"{"from": "e2", "to": "e4"}"#).unwrap();
        assert_eq!(MoveRequest::new(E2, E4), req);

        let stored = MoveRequest::promoting(A7, A8, PieceKind::Rook);
        let json = serde_json::to_string(&stored).unwrap();
        assert_eq!(stored, serde_json::from_str::<MoveRequest>(&json).unwrap());
    }

    #[test]
    fn flags_round_trip_through_json() {
        let flags = MoveFlags::CAPTURE | MoveFlags::CHECK;
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!("33", json);
        assert_eq!(flags, serde_json::from_str::<MoveFlags>(&json).unwrap());
        assert!(serde_json::from_str::<MoveFlags>("128").is_err());
    }
}
