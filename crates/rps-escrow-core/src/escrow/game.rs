//! Game records.

use crate::games::Move;
use crate::protocol::{GameId, Outcome, Player};
use rps_token::Address;
use serde::{Deserialize, Serialize};

/// Where a game is in its lifecycle. Derived from the record, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    AwaitingJoin,
    AwaitingFirstMove,
    AwaitingSecondMove,
    Resolved,
    Discarded,
    TimedOut,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GamePhase::Resolved | GamePhase::Discarded | GamePhase::TimedOut
        )
    }
}

/// How a finished game paid out its locked stakes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    Resolved {
        outcome: Outcome,
        payout_one: u64,
        payout_two: u64,
    },
    Discarded {
        refund: u64,
    },
    TimedOut {
        unresponsive: Player,
        delay_fee: u64,
        payout_responsive: u64,
        payout_unresponsive: u64,
        /// Integer-division remainder paid to neither player
        burned: u64,
    },
}

/// A single game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub player_one: Address,
    pub player_two: Option<Address>,
    pub move_one: Option<Move>,
    pub move_two: Option<Move>,
    /// Set by the first move of the pair, not at creation or join
    pub start_time: Option<u64>,
    pub bet_amount: u64,
    /// Joinable: true from creation until joined or discarded
    pub open: bool,
    pub settlement: Option<Settlement>,
}

impl Game {
    pub(crate) fn new(id: GameId, player_one: Address, bet_amount: u64) -> Self {
        Self {
            id,
            player_one,
            player_two: None,
            move_one: None,
            move_two: None,
            start_time: None,
            bet_amount,
            open: true,
            settlement: None,
        }
    }

    pub fn finished(&self) -> bool {
        self.settlement.is_some()
    }

    pub fn phase(&self) -> GamePhase {
        match self.settlement {
            Some(Settlement::Resolved { .. }) => GamePhase::Resolved,
            Some(Settlement::Discarded { .. }) => GamePhase::Discarded,
            Some(Settlement::TimedOut { .. }) => GamePhase::TimedOut,
            None if self.open => GamePhase::AwaitingJoin,
            None if self.start_time.is_none() => GamePhase::AwaitingFirstMove,
            None => GamePhase::AwaitingSecondMove,
        }
    }

    pub fn player(&self, seat: Player) -> Option<Address> {
        match seat {
            Player::One => Some(self.player_one),
            Player::Two => self.player_two,
        }
    }

    pub fn move_of(&self, seat: Player) -> Option<Move> {
        match seat {
            Player::One => self.move_one,
            Player::Two => self.move_two,
        }
    }

    pub fn is_player(&self, account: &Address) -> bool {
        self.player_one == *account || self.player_two.as_ref() == Some(account)
    }

    /// Seat `account` may still move from: player one first, then player two.
    /// The same account can hold both seats if it joined its own game.
    pub(crate) fn open_seat_for(&self, account: &Address) -> Option<Player> {
        [Player::One, Player::Two].into_iter().find(|seat| {
            self.player(*seat).as_ref() == Some(account) && self.move_of(*seat).is_none()
        })
    }

    pub(crate) fn set_move(&mut self, seat: Player, mv: Move) {
        match seat {
            Player::One => self.move_one = Some(mv),
            Player::Two => self.move_two = Some(mv),
        }
    }

    /// Stake currently locked in this game
    pub fn locked_stake(&self) -> u128 {
        let bet = u128::from(self.bet_amount);
        if self.finished() {
            0
        } else if self.player_two.is_some() {
            bet * 2
        } else {
            bet
        }
    }
}
