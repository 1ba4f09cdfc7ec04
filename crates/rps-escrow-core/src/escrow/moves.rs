//! Move submission and resolution.

use super::game::Settlement;
use super::{Escrow, TIMEOUT_WINDOW};
use crate::error::{EscrowError, Rejection};
use crate::games::{resolve, Move};
use crate::protocol::{GameId, Outcome, OutcomeEvent, Player};
use rps_token::Address;
use serde::Serialize;
use tracing::{info, warn};

/// What a successful `send_move` did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveReceipt {
    /// First move of the pair; the timeout window started at `started_at`
    AwaitingOpponent { seat: Player, started_at: u64 },
    /// Second move; the game is settled
    Resolved { seat: Player, outcome: Outcome },
}

impl Escrow {
    /// Record `mv` for the caller's seat. The second move of the pair settles
    /// the game if it arrives within the timeout window.
    pub fn send_move(
        &self,
        caller: Address,
        game_id: GameId,
        mv: Move,
    ) -> Result<MoveReceipt, EscrowError> {
        let reject = |reason: Rejection| {
            warn!(%game_id, %caller, %reason, "move rejected");
            EscrowError::MoveRejected { game_id, reason }
        };

        let handle = self
            .game_handle(game_id)
            .ok_or_else(|| reject(Rejection::UnknownGame))?;
        let mut game = handle.lock().unwrap();

        if game.finished() {
            return Err(reject(Rejection::Finished));
        }
        if !game.is_player(&caller) {
            return Err(reject(Rejection::NotPlayer));
        }
        let Some(player_two) = game.player_two else {
            return Err(reject(Rejection::NotJoined));
        };
        let seat = game
            .open_seat_for(&caller)
            .ok_or_else(|| reject(Rejection::AlreadyMoved))?;

        let now = self.clock.now();

        let Some(started_at) = game.start_time else {
            game.set_move(seat, mv);
            game.start_time = Some(now);
            info!(%game_id, %seat, "first move received, waiting for opponent");
            return Ok(MoveReceipt::AwaitingOpponent {
                seat,
                started_at: now,
            });
        };

        if now > started_at.saturating_add(TIMEOUT_WINDOW) {
            warn!(%game_id, %caller, started_at, now, "second move arrived too late");
            return Err(EscrowError::TimedOutWindow { game_id });
        }

        // The clock starts with the first move, and `seat` is still empty, so
        // the opponent's seat holds that first move.
        let (move_one, move_two) = match (seat, game.move_of(seat.opponent())) {
            (Player::One, Some(other)) => (mv, other),
            (Player::Two, Some(other)) => (other, mv),
            (_, None) => return Err(reject(Rejection::AlreadyMoved)),
        };

        let outcome = resolve(move_one, move_two);
        let (payout_one, payout_two) = outcome
            .payouts(game.bet_amount)
            .ok_or(EscrowError::BalanceOverflow)?;

        self.ledger
            .pay_out(&[(game.player_one, payout_one), (player_two, payout_two)])?;

        game.set_move(seat, mv);
        game.settlement = Some(Settlement::Resolved {
            outcome,
            payout_one,
            payout_two,
        });

        let winner = match outcome.winner() {
            None => Address::ZERO,
            Some(Player::One) => game.player_one,
            Some(Player::Two) => player_two,
        };
        self.emit(OutcomeEvent { game_id, winner });

        info!(%game_id, %move_one, %move_two, %outcome, %winner, "game resolved");
        Ok(MoveReceipt::Resolved { seat, outcome })
    }
}
