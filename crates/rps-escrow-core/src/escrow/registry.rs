//! Game creation, joining and discard.

use super::game::{Game, Settlement};
use super::Escrow;
use crate::error::{EscrowError, Rejection};
use crate::protocol::GameId;
use rps_token::Address;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

impl Escrow {
    /// Lock `bet_amount` from the creator's free balance into a new open game
    pub fn create_game(&self, creator: Address, bet_amount: u64) -> Result<GameId, EscrowError> {
        let mut games = self.games.write().unwrap();

        if let Err(e) = self.ledger.lock_stake(creator, bet_amount) {
            warn!(%creator, bet_amount, "create game rejected: insufficient free balance");
            return Err(e);
        }

        let game_id = GameId::new(games.len() as u64);
        games.push(Arc::new(Mutex::new(Game::new(game_id, creator, bet_amount))));

        info!(%game_id, %creator, bet_amount, "game created");
        Ok(game_id)
    }

    /// Refund the creator's stake from a game nobody has joined yet
    pub fn discard_created_game(&self, caller: Address, game_id: GameId) -> Result<(), EscrowError> {
        let reject = |reason: Rejection| {
            warn!(%game_id, %caller, %reason, "discard rejected");
            EscrowError::DiscardRejected { game_id, reason }
        };

        let handle = self
            .game_handle(game_id)
            .ok_or_else(|| reject(Rejection::UnknownGame))?;
        let mut game = handle.lock().unwrap();

        if !game.open {
            return Err(reject(Rejection::NotOpen));
        }
        if game.player_one != caller {
            return Err(reject(Rejection::NotOwner));
        }

        let refund = game.bet_amount;
        self.ledger.pay_out(&[(game.player_one, refund)])?;
        game.open = false;
        game.settlement = Some(Settlement::Discarded { refund });

        info!(%game_id, %caller, refund, "game discarded");
        Ok(())
    }

    /// Take the second seat of an open game, locking an equal stake
    pub fn join_game(&self, caller: Address, game_id: GameId) -> Result<(), EscrowError> {
        let reject = |reason: Rejection| {
            warn!(%game_id, %caller, %reason, "join rejected");
            EscrowError::JoinRejected { game_id, reason }
        };

        let handle = self
            .game_handle(game_id)
            .ok_or_else(|| reject(Rejection::UnknownGame))?;
        let mut game = handle.lock().unwrap();

        if !game.open {
            return Err(reject(Rejection::NotOpen));
        }
        if self.ledger.lock_stake(caller, game.bet_amount).is_err() {
            return Err(reject(Rejection::InsufficientFunds));
        }

        game.player_two = Some(caller);
        game.open = false;

        info!(%game_id, player_two = %caller, bet_amount = game.bet_amount, "game joined");
        Ok(())
    }
}
