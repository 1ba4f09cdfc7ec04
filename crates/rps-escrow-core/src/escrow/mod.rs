//! The escrow state manager.
//!
//! `Escrow` owns the balance ledger, every game and the outcome log. Each
//! public operation is atomic: it either completes or leaves all state as it
//! found it.
//!
//! Locks are always taken in this order, and never in reverse:
//! game table -> single game -> free balances. Operations on distinct games
//! only share the free-balance lock, held for a few map updates.

mod game;
mod ledger;
mod moves;
mod registry;
mod timeout;

pub use game::{Game, GamePhase, Settlement};
pub use ledger::BalanceLedger;
pub use moves::MoveReceipt;
pub use timeout::TimeoutPayout;

use crate::clock::Clock;
use crate::error::EscrowError;
use crate::protocol::{GameId, OutcomeEvent};
use rps_token::{Address, TokenClient};
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};

/// Seconds the second mover has after the first move
pub const TIMEOUT_WINDOW: u64 = 300;

/// Conservation snapshot. Sums are widened so they cannot overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerAudit {
    /// Sum of free balances
    pub free: u128,
    /// Sum of stakes locked in unfinished games
    pub locked: u128,
    /// Timeout remainders kept in custody
    pub burned: u128,
}

impl LedgerAudit {
    /// Tokens the custody account must hold
    pub fn total(&self) -> u128 {
        self.free + self.locked + self.burned
    }
}

pub struct Escrow {
    ledger: BalanceLedger,
    /// Indexed by game id
    games: RwLock<Vec<Arc<Mutex<Game>>>>,
    clock: Arc<dyn Clock>,
    events: Mutex<Vec<OutcomeEvent>>,
}

impl Escrow {
    pub fn new(token: Arc<dyn TokenClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: BalanceLedger::new(token),
            games: RwLock::new(Vec::new()),
            clock,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub async fn deposit(&self, account: Address, amount: u64) -> Result<u64, EscrowError> {
        self.ledger.deposit(account, amount).await
    }

    pub async fn withdraw(&self, account: Address, amount: u64) -> Result<u64, EscrowError> {
        self.ledger.withdraw(account, amount).await
    }

    /// Free balance of `account`
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.ledger.balance_of(account)
    }

    /// Id the next created game will get
    pub fn next_game_id(&self) -> GameId {
        GameId::new(self.games.read().unwrap().len() as u64)
    }

    /// Snapshot of a game
    pub fn game(&self, game_id: GameId) -> Option<Game> {
        self.game_handle(game_id)
            .map(|game| game.lock().unwrap().clone())
    }

    /// Whether `game_id` can be joined
    pub fn is_open(&self, game_id: GameId) -> bool {
        self.game(game_id).map(|g| g.open).unwrap_or(false)
    }

    /// All joinable games, oldest first
    pub fn open_games(&self) -> Vec<Game> {
        self.snapshot().into_iter().filter(|g| g.open).collect()
    }

    /// Outcome events in emission order
    pub fn events(&self) -> Vec<OutcomeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Totals of free, locked and burned value. Exact only while no
    /// operation is in flight.
    pub fn audit(&self) -> LedgerAudit {
        let free = self.ledger.total_free();
        let locked = self.snapshot().iter().map(Game::locked_stake).sum();
        LedgerAudit {
            free,
            locked,
            burned: u128::from(self.ledger.burned()),
        }
    }

    fn snapshot(&self) -> Vec<Game> {
        let handles: Vec<_> = self.games.read().unwrap().iter().cloned().collect();
        handles
            .iter()
            .map(|game| game.lock().unwrap().clone())
            .collect()
    }

    fn game_handle(&self, game_id: GameId) -> Option<Arc<Mutex<Game>>> {
        let index = usize::try_from(game_id.as_u64()).ok()?;
        self.games.read().unwrap().get(index).cloned()
    }

    fn emit(&self, event: OutcomeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
