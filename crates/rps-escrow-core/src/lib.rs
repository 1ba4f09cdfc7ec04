//! RPS Escrow Core Library
//!
//! This crate provides the escrow-backed rock-paper-scissors game factory:
//! a custodial balance ledger, the game lifecycle state machine, the outcome
//! resolver and the timeout penalty. All state lives in a single [`Escrow`].

pub mod clock;
pub mod error;
pub mod escrow;
pub mod games;
pub mod protocol;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, EscrowError, Rejection};
pub use escrow::{
    Escrow, Game, GamePhase, LedgerAudit, MoveReceipt, Settlement, TimeoutPayout, TIMEOUT_WINDOW,
};
pub use games::{is_p1_winner, resolve, Move, WIN_TABLE};
pub use protocol::{GameId, Outcome, OutcomeEvent, Player};
