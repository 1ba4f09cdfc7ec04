//! Penalizing an opponent who never sent the second move.

use super::game::Settlement;
use super::{Escrow, TIMEOUT_WINDOW};
use crate::error::{EscrowError, Rejection};
use crate::protocol::{GameId, OutcomeEvent, Player};
use rps_token::Address;
use tracing::{info, warn};

/// Split of a timed-out game's stakes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutPayout {
    /// One fifth of the stake, rounded down
    pub delay_fee: u64,
    /// `bet_amount + delay_fee`
    pub responsive: u64,
    /// `4 * delay_fee`
    pub unresponsive: u64,
    /// `bet_amount % 5`, kept in custody
    pub burned: u64,
}

impl TimeoutPayout {
    pub fn for_bet(bet_amount: u64) -> Self {
        let delay_fee = bet_amount / 5;
        Self {
            delay_fee,
            responsive: bet_amount + delay_fee,
            unresponsive: delay_fee * 4,
            burned: bet_amount % 5,
        }
    }
}

impl Escrow {
    /// Settle a game whose second move did not arrive within the window.
    /// Either player may call it. Returns the unresponsive seat.
    pub fn time_out(&self, caller: Address, game_id: GameId) -> Result<Player, EscrowError> {
        let reject = |reason: Rejection| {
            warn!(%game_id, %caller, %reason, "timeout rejected");
            EscrowError::TimeOutRejected { game_id, reason }
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

        let now = self.clock.now();
        let expired = game
            .start_time
            .is_some_and(|started_at| now > started_at.saturating_add(TIMEOUT_WINDOW));
        if !expired {
            warn!(%game_id, %caller, start_time = ?game.start_time, now, "timeout called early");
            return Err(EscrowError::TimeNotExceeded { game_id });
        }

        // A started clock means exactly one seat has moved.
        let unresponsive = if game.move_one.is_none() {
            Player::One
        } else {
            Player::Two
        };
        let responsive = unresponsive.opponent();
        let (Some(responsive_account), Some(unresponsive_account)) =
            (game.player(responsive), game.player(unresponsive))
        else {
            return Err(reject(Rejection::NotJoined));
        };

        let payout = TimeoutPayout::for_bet(game.bet_amount);
        self.ledger.pay_out(&[
            (responsive_account, payout.responsive),
            (unresponsive_account, payout.unresponsive),
        ])?;
        self.ledger.burn(payout.burned);

        game.settlement = Some(Settlement::TimedOut {
            unresponsive,
            delay_fee: payout.delay_fee,
            payout_responsive: payout.responsive,
            payout_unresponsive: payout.unresponsive,
            burned: payout.burned,
        });
        self.emit(OutcomeEvent {
            game_id,
            winner: responsive_account,
        });

        info!(
            %game_id,
            %caller,
            %unresponsive,
            delay_fee = payout.delay_fee,
            burned = payout.burned,
            "game timed out"
        );
        Ok(unresponsive)
    }
}
