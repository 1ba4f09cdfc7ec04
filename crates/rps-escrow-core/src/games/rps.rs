//! Rock-Paper-Scissors moves and the outcome resolver.

use crate::error::EscrowError;
use crate::protocol::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A submitted move. An unsent move slot is `None`, never a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

/// Ordered `(player one, player two)` pairs in which player one wins
pub const WIN_TABLE: [(Move, Move); 3] = [
    (Move::Rock, Move::Scissors),
    (Move::Scissors, Move::Paper),
    (Move::Paper, Move::Rock),
];

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        is_p1_winner(*self, *other)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            _ => Err(EscrowError::InvalidMove(s.to_string())),
        }
    }
}

/// Win table lookup: does player one's move beat player two's?
pub fn is_p1_winner(move_one: Move, move_two: Move) -> bool {
    WIN_TABLE.contains(&(move_one, move_two))
}

/// Decide a game from both moves.
///
/// Ties are checked first, so a pair missing from the win table is always a
/// player-two win.
pub fn resolve(move_one: Move, move_two: Move) -> Outcome {
    if move_one == move_two {
        Outcome::Draw
    } else if is_p1_winner(move_one, move_two) {
        Outcome::PlayerOneWins
    } else {
        Outcome::PlayerTwoWins
    }
}
