//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Game identifier, assigned sequentially from 0 and never reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for GameId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Draw,
    PlayerOneWins,
    PlayerTwoWins,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Draw => "Draw",
            Outcome::PlayerOneWins => "Player one wins",
            Outcome::PlayerTwoWins => "Player two wins",
        }
    }

    /// Winning seat, `None` for a draw
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Draw => None,
            Outcome::PlayerOneWins => Some(Player::One),
            Outcome::PlayerTwoWins => Some(Player::Two),
        }
    }

    /// Split both locked stakes of `bet_amount` into `(player one, player two)`
    /// payouts. The two payouts always add up to `2 * bet_amount`; `None` only
    /// if that sum does not fit in a `u64`.
    pub fn payouts(&self, bet_amount: u64) -> Option<(u64, u64)> {
        let pot = bet_amount.checked_mul(2)?;
        Some(match self {
            Outcome::Draw => (bet_amount, bet_amount),
            Outcome::PlayerOneWins => (pot, 0),
            Outcome::PlayerTwoWins => (0, pot),
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seat in a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opponent
    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player one"),
            Player::Two => write!(f, "player two"),
        }
    }
}
